//! MaaS360 administrator authentication.
//!
//! Exchanges administrator credentials (or a previously issued refresh
//! token) for a bearer token pair via the `auth-apis` endpoints of the
//! instance that owns the billing ID. Tokens are opaque and carry no
//! client-side expiry; callers re-authenticate (or refresh) when a resource
//! call starts failing with 401.

use std::fmt;

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use serde::{Deserialize, Serialize};

use crate::error::{MaasError, Result, require};
use crate::flexible::{FlexibleInt, null_as_default};
use crate::transport::Transport;

/// Platform ID the vendor expects from API clients.
pub const PLATFORM_ID: &str = "3";
/// App version sent in the credential envelope.
pub const APP_VERSION: &str = "1.0";

const AUTHENTICATE_PATH: &str = "/auth-apis/auth/2.0/authenticate/customer";
const REFRESH_PATH: &str = "/auth-apis/auth/2.0/refreshToken/customer";

// ── Credentials ────────────────────────────────────────────────────────

/// Administrator credentials for the MaaS360 auth API.
///
/// Exactly one of `password` / `refresh_token` is needed. When both are
/// set, the password flow wins.
#[derive(Clone, Default)]
pub struct Credentials {
    /// Customer billing ID; its first digit selects the instance.
    pub billing_id: String,
    /// Application ID issued by MaaS360 for API access.
    pub app_id: String,
    /// Application access key.
    pub access_key: String,
    /// Administrator user name.
    pub username: String,
    /// Administrator password. Leave empty to use `refresh_token`.
    pub password: String,
    /// Refresh token from a previous authentication.
    pub refresh_token: String,
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("billing_id", &self.billing_id)
            .field("app_id", &self.app_id)
            .field("access_key", &"<redacted>")
            .field("username", &self.username)
            .field("password", &redacted(&self.password))
            .field("refresh_token", &redacted(&self.refresh_token))
            .finish()
    }
}

fn redacted(secret: &str) -> &'static str {
    if secret.is_empty() { "" } else { "<redacted>" }
}

/// The token pair returned by a successful authentication.
#[derive(Clone, PartialEq, Eq)]
pub struct AuthTokens {
    /// Bearer token for resource calls.
    pub access_token: String,
    /// Token to obtain a new access token without the password.
    pub refresh_token: String,
}

impl fmt::Debug for AuthTokens {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AuthTokens")
            .field("access_token", &"<redacted>")
            .field("refresh_token", &"<redacted>")
            .finish()
    }
}

/// Per-call context for resource operations: who is calling and with
/// which bearer token.
///
/// Both parts are validated once, at construction.
#[derive(Clone, PartialEq, Eq)]
pub struct Session {
    billing_id: String,
    access_token: String,
}

impl Session {
    /// Creates a session from a billing ID and an access token.
    ///
    /// # Errors
    ///
    /// `MaasError::InvalidArgument` if either value is empty.
    pub fn new(billing_id: impl Into<String>, access_token: impl Into<String>) -> Result<Self> {
        let billing_id = billing_id.into();
        let access_token = access_token.into();
        require("billing_id", &billing_id)?;
        require("access_token", &access_token)?;
        Ok(Session {
            billing_id,
            access_token,
        })
    }

    /// The customer billing ID.
    pub fn billing_id(&self) -> &str {
        &self.billing_id
    }

    /// The bearer token sent as `MaaS token="..."`.
    pub fn access_token(&self) -> &str {
        &self.access_token
    }
}

impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session")
            .field("billing_id", &self.billing_id)
            .field("access_token", &"<redacted>")
            .finish()
    }
}

// ── Wire types ─────────────────────────────────────────────────────────

/// Inner credential object of the auth request body.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct AdminAuth<'a> {
    #[serde(rename = "billingID")]
    billing_id: &'a str,
    #[serde(rename = "platformID")]
    platform_id: &'a str,
    app_version: &'a str,
    #[serde(rename = "appID")]
    app_id: &'a str,
    app_access_key: &'a str,
    user_name: &'a str,
    #[serde(skip_serializing_if = "str::is_empty")]
    password: &'a str,
    #[serde(skip_serializing_if = "str::is_empty")]
    refresh_token: &'a str,
}

#[derive(Serialize)]
struct AuthRequest<'a> {
    #[serde(rename = "maaS360AdminAuth")]
    admin_auth: AdminAuth<'a>,
}

/// Request body: `{"authRequest":{"maaS360AdminAuth":{...}}}`.
#[derive(Serialize)]
struct AuthParams<'a> {
    #[serde(rename = "authRequest")]
    request: AuthRequest<'a>,
}

/// Payload of the `authResponse` envelope.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AuthResponseBody {
    /// `0` on success, vendor-specific otherwise.
    pub error_code: FlexibleInt,
    /// Human-readable description of a failure.
    #[serde(deserialize_with = "null_as_default")]
    pub error_desc: String,
    /// The access token.
    #[serde(deserialize_with = "null_as_default")]
    pub auth_token: String,
    /// The refresh token.
    #[serde(deserialize_with = "null_as_default")]
    pub refresh_token: String,
}

/// Response envelope: `{"authResponse":{...}}`.
#[derive(Debug, Deserialize)]
pub struct AuthResponse {
    /// The wrapped payload.
    #[serde(rename = "authResponse")]
    pub body: AuthResponseBody,
}

// ── Flow ───────────────────────────────────────────────────────────────

/// Obtains a token pair for `credentials`.
///
/// Uses the password flow when a password is present, otherwise the
/// refresh-token flow.
///
/// # Errors
///
/// - `MaasError::InvalidArgument` — empty billing ID.
/// - `MaasError::MissingCredential` — neither password nor refresh token;
///   no request is sent.
/// - `MaasError::InvalidIdentifier` — unknown billing-ID prefix.
/// - `MaasError::RemoteAuth` — HTTP 200 with a non-zero `errorCode`.
/// - `MaasError::IncompleteAuthResponse` — a token is missing from an
///   otherwise successful response.
/// - `MaasError::UnexpectedStatus` / `Network` / `Parse` — transport and
///   decoding failures.
pub async fn authenticate(transport: &Transport, credentials: &Credentials) -> Result<AuthTokens> {
    require("billing_id", &credentials.billing_id)?;

    let (path, password, refresh_token) = if !credentials.password.is_empty() {
        (AUTHENTICATE_PATH, credentials.password.as_str(), "")
    } else if !credentials.refresh_token.is_empty() {
        (REFRESH_PATH, "", credentials.refresh_token.as_str())
    } else {
        return Err(MaasError::MissingCredential);
    };

    let params = AuthParams {
        request: AuthRequest {
            admin_auth: AdminAuth {
                billing_id: &credentials.billing_id,
                platform_id: PLATFORM_ID,
                app_version: APP_VERSION,
                app_id: &credentials.app_id,
                app_access_key: &credentials.access_key,
                user_name: &credentials.username,
                password,
                refresh_token,
            },
        },
    };

    let url = transport.url(
        &credentials.billing_id,
        &format!("{path}/{}", credentials.billing_id),
        [],
    )?;

    tracing::info!(
        "Authenticating billing ID {} as {}",
        credentials.billing_id,
        credentials.username
    );
    let body = transport.post_json(url, None, &params).await?;
    let parsed: AuthResponse = serde_json::from_str(&body)?;

    let tokens = tokens_from_response(parsed.body)?;
    tracing::info!("Authenticated billing ID {}", credentials.billing_id);
    Ok(tokens)
}

/// Validates the decoded envelope and extracts the token pair.
fn tokens_from_response(body: AuthResponseBody) -> Result<AuthTokens> {
    let code = body.error_code.value();
    if code != 0 {
        tracing::error!("MaaS360 rejected authentication: {} (code {})", body.error_desc, code);
        return Err(MaasError::RemoteAuth {
            code,
            description: body.error_desc,
        });
    }
    if body.auth_token.is_empty() {
        return Err(MaasError::IncompleteAuthResponse {
            missing: "auth token",
        });
    }
    if body.refresh_token.is_empty() {
        return Err(MaasError::IncompleteAuthResponse {
            missing: "refresh token",
        });
    }
    Ok(AuthTokens {
        access_token: body.auth_token,
        refresh_token: body.refresh_token,
    })
}

/// Builds a `Basic` authorization header value from `username:password`.
///
/// Returns `None` when either part is empty.
pub fn basic_auth(username: &str, password: &str) -> Option<String> {
    if username.is_empty() || password.is_empty() {
        return None;
    }
    let encoded = STANDARD.encode(format!("{username}:{password}"));
    Some(format!("Basic {encoded}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn credentials() -> Credentials {
        Credentials {
            billing_id: "30012345".to_string(),
            app_id: "com.example.tool".to_string(),
            access_key: "key-123".to_string(),
            username: "admin".to_string(),
            password: "hunter2".to_string(),
            refresh_token: String::new(),
        }
    }

    #[test]
    fn request_body_matches_vendor_envelope() {
        let creds = credentials();
        let params = AuthParams {
            request: AuthRequest {
                admin_auth: AdminAuth {
                    billing_id: &creds.billing_id,
                    platform_id: PLATFORM_ID,
                    app_version: APP_VERSION,
                    app_id: &creds.app_id,
                    app_access_key: &creds.access_key,
                    user_name: &creds.username,
                    password: &creds.password,
                    refresh_token: "",
                },
            },
        };
        let json = serde_json::to_value(&params).unwrap();
        let inner = &json["authRequest"]["maaS360AdminAuth"];
        assert_eq!(inner["billingID"], "30012345");
        assert_eq!(inner["platformID"], "3");
        assert_eq!(inner["appVersion"], "1.0");
        assert_eq!(inner["appID"], "com.example.tool");
        assert_eq!(inner["appAccessKey"], "key-123");
        assert_eq!(inner["userName"], "admin");
        assert_eq!(inner["password"], "hunter2");
        assert!(
            inner.get("refreshToken").is_none(),
            "empty refresh token must be omitted"
        );
    }

    #[test]
    fn response_with_numeric_string_error_code_decodes() {
        let json = r#"{"authResponse":{"errorCode":"0","authToken":"tok","refreshToken":"ref"}}"#;
        let parsed: AuthResponse = serde_json::from_str(json).unwrap();
        let tokens = tokens_from_response(parsed.body).unwrap();
        assert_eq!(tokens.access_token, "tok");
        assert_eq!(tokens.refresh_token, "ref");
    }

    #[test]
    fn null_tokens_decode_as_empty() {
        let json = r#"{"authResponse":{"errorCode":1007,"errorDesc":"Invalid credentials","authToken":null,"refreshToken":null}}"#;
        let parsed: AuthResponse = serde_json::from_str(json).unwrap();
        assert!(parsed.body.auth_token.is_empty());
        assert!(matches!(
            tokens_from_response(parsed.body),
            Err(MaasError::RemoteAuth { code: 1007, .. })
        ));

        let json = r#"{"authResponse":{"errorCode":"3","errorDesc":null}}"#;
        let parsed: AuthResponse = serde_json::from_str(json).unwrap();
        assert_eq!(parsed.body.error_desc, "");
    }

    #[test]
    fn non_zero_error_code_is_remote_auth_error() {
        let body = AuthResponseBody {
            error_code: FlexibleInt::Present(1007),
            error_desc: "Invalid credentials".to_string(),
            ..Default::default()
        };
        match tokens_from_response(body) {
            Err(MaasError::RemoteAuth { code, description }) => {
                assert_eq!(code, 1007);
                assert_eq!(description, "Invalid credentials");
            }
            other => panic!("expected RemoteAuth, got {other:?}"),
        }
    }

    #[test]
    fn missing_tokens_are_reported() {
        let body = AuthResponseBody {
            error_code: FlexibleInt::Present(0),
            refresh_token: "ref".to_string(),
            ..Default::default()
        };
        assert!(matches!(
            tokens_from_response(body),
            Err(MaasError::IncompleteAuthResponse { missing: "auth token" })
        ));

        let body = AuthResponseBody {
            auth_token: "tok".to_string(),
            ..Default::default()
        };
        assert!(matches!(
            tokens_from_response(body),
            Err(MaasError::IncompleteAuthResponse { missing: "refresh token" })
        ));
    }

    #[tokio::test]
    async fn missing_password_and_refresh_token_fails_before_network() {
        // Endpoint override points at a port nothing listens on; reaching
        // the network would surface as a Network error instead.
        let transport = Transport::with_endpoint("http://127.0.0.1:1").unwrap();
        let creds = Credentials {
            password: String::new(),
            ..credentials()
        };
        let err = authenticate(&transport, &creds).await.unwrap_err();
        assert!(matches!(err, MaasError::MissingCredential), "got {err:?}");
    }

    #[test]
    fn basic_auth_encodes_user_and_password() {
        assert_eq!(
            basic_auth("testUser", "testPass").as_deref(),
            Some("Basic dGVzdFVzZXI6dGVzdFBhc3M=")
        );
    }

    #[test]
    fn basic_auth_is_none_for_empty_parts() {
        assert!(basic_auth("", "pass").is_none());
        assert!(basic_auth("user", "").is_none());
    }

    #[test]
    fn session_rejects_empty_parts() {
        assert!(matches!(
            Session::new("", "tok"),
            Err(MaasError::InvalidArgument { field: "billing_id", .. })
        ));
        assert!(matches!(
            Session::new("30012345", ""),
            Err(MaasError::InvalidArgument { field: "access_token", .. })
        ));
        let session = Session::new("30012345", "tok").unwrap();
        assert_eq!(session.billing_id(), "30012345");
        assert_eq!(session.access_token(), "tok");
        assert!(!format!("{session:?}").contains("tok\""));
    }

    #[test]
    fn debug_output_redacts_secrets() {
        let rendered = format!("{:?}", credentials());
        assert!(!rendered.contains("hunter2"));
        assert!(!rendered.contains("key-123"));
        assert!(rendered.contains("30012345"));
    }
}
