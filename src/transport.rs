//! HTTP transport shared by every MaaS360 resource call.
//!
//! `Transport` wraps a single `reqwest::Client` built once with fixed
//! timeouts. It is constructed explicitly by the caller and passed into
//! each resource function and into [`MaasClient`](crate::client::MaasClient);
//! there is no process-wide client. Cloning is cheap (the inner client is
//! reference counted), so one transport can serve concurrent tasks.
//!
//! Request contract:
//! - `Authorization: MaaS token="<token>"` on every resource call;
//!   the auth endpoint itself is called without it.
//! - `Accept: application/json`.
//! - Bodyless requests carry `Content-Type: application/x-www-form-urlencoded`,
//!   JSON requests `application/json`.
//! - Exactly one attempt per call. Any status other than 200 becomes
//!   [`MaasError::UnexpectedStatus`] with the body preserved; no retries.

use std::time::Duration;

use reqwest::header::{ACCEPT, AUTHORIZATION, CONTENT_TYPE};
use reqwest::{Client, Method, StatusCode};
use serde::Serialize;
use serde::de::DeserializeOwned;
use url::Url;

use crate::endpoint;
use crate::error::{MaasError, Result};

/// Connect timeout (TCP + TLS handshake).
const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

/// Overall per-request timeout, including reading the response body.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

const CONTENT_TYPE_JSON: &str = "application/json";
const CONTENT_TYPE_FORM: &str = "application/x-www-form-urlencoded";

/// Formats the vendor's authorization header value.
pub(crate) fn maas_token_header(token: &str) -> String {
    format!("MaaS token=\"{token}\"")
}

fn build_http_client(timeout: Duration) -> Result<Client> {
    Ok(Client::builder()
        .connect_timeout(CONNECT_TIMEOUT)
        .timeout(timeout)
        .build()?)
}

/// Injected HTTP handle for the MaaS360 API.
///
/// `endpoint_override` replaces the instance URL derived from the billing
/// ID. Tests point it at a mock server; it can also route traffic through a
/// proxy host. The billing ID is still validated when an override is set.
#[derive(Debug, Clone)]
pub struct Transport {
    http: Client,
    endpoint_override: Option<String>,
}

impl Transport {
    /// Builds a transport with the default timeouts.
    ///
    /// # Errors
    ///
    /// `MaasError::Network` if the TLS backend cannot be initialised.
    pub fn new() -> Result<Self> {
        Self::with_timeout(REQUEST_TIMEOUT)
    }

    /// Builds a transport with a custom overall request timeout.
    pub fn with_timeout(timeout: Duration) -> Result<Self> {
        Ok(Transport {
            http: build_http_client(timeout)?,
            endpoint_override: None,
        })
    }

    /// Builds a transport that sends every request to `base_url` instead of
    /// the instance selected by the billing ID.
    pub fn with_endpoint(base_url: &str) -> Result<Self> {
        Ok(Transport {
            http: build_http_client(REQUEST_TIMEOUT)?,
            endpoint_override: Some(base_url.trim_end_matches('/').to_string()),
        })
    }

    /// Resolves the service base URL for a billing ID.
    ///
    /// # Errors
    ///
    /// `MaasError::InvalidIdentifier` for an empty or unknown billing ID,
    /// even when an endpoint override is configured.
    pub fn service_url(&self, billing_id: &str) -> Result<String> {
        let resolved = endpoint::service_url(billing_id)?;
        Ok(self
            .endpoint_override
            .clone()
            .unwrap_or_else(|| resolved.to_string()))
    }

    /// Joins `path` onto the service URL and appends URL-encoded query
    /// parameters.
    pub(crate) fn url<'a, I>(&self, billing_id: &str, path: &str, query: I) -> Result<Url>
    where
        I: IntoIterator<Item = (&'a str, &'a str)>,
    {
        let base = self.service_url(billing_id)?;
        let mut url = Url::parse(&format!("{base}{path}"))?;
        {
            let mut pairs = url.query_pairs_mut();
            for (key, value) in query {
                pairs.append_pair(key, value);
            }
        }
        // `query_pairs_mut` leaves a bare `?` behind when nothing was added.
        if url.query() == Some("") {
            url.set_query(None);
        }
        Ok(url)
    }

    /// Sends an authenticated GET and decodes the JSON response.
    pub(crate) async fn get<T: DeserializeOwned>(&self, url: Url, token: &str) -> Result<T> {
        let body = self.send::<()>(Method::GET, url, Some(token), None).await?;
        Ok(serde_json::from_str(&body)?)
    }

    /// Sends an authenticated POST with a JSON body.
    ///
    /// The raw response text is returned so action-style callers can decide
    /// how to treat an empty body.
    pub(crate) async fn post_json<B: Serialize + ?Sized>(
        &self,
        url: Url,
        token: Option<&str>,
        body: &B,
    ) -> Result<String> {
        self.send(Method::POST, url, token, Some(body)).await
    }

    /// Sends an authenticated POST without a body. Parameters travel in the
    /// query string.
    pub(crate) async fn post_empty(&self, url: Url, token: &str) -> Result<String> {
        self.send::<()>(Method::POST, url, Some(token), None).await
    }

    /// Core HTTP method: one request, one response, status checked.
    ///
    /// The body is read as text before the status check so a non-200 error
    /// keeps the vendor's diagnostic message.
    async fn send<B: Serialize + ?Sized>(
        &self,
        method: Method,
        url: Url,
        token: Option<&str>,
        body: Option<&B>,
    ) -> Result<String> {
        tracing::debug!("{} {}", method, url);

        let mut req = self
            .http
            .request(method.clone(), url.clone())
            .header(ACCEPT, CONTENT_TYPE_JSON);
        if let Some(token) = token {
            req = req.header(AUTHORIZATION, maas_token_header(token));
        }
        req = match body {
            Some(payload) => req.header(CONTENT_TYPE, CONTENT_TYPE_JSON).json(payload),
            None => req.header(CONTENT_TYPE, CONTENT_TYPE_FORM),
        };

        let resp = req.send().await.map_err(|e| {
            tracing::error!("{} {} failed: {}", method, url.path(), e);
            MaasError::Network(e)
        })?;

        let status = resp.status();
        tracing::debug!("{} {} -> {}", method, url.path(), status);
        let text = resp.text().await?;

        if status != StatusCode::OK {
            tracing::warn!("{} {} returned HTTP {}", method, url.path(), status);
            return Err(MaasError::UnexpectedStatus { status, body: text });
        }
        Ok(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn token_header_uses_maas_scheme() {
        assert_eq!(maas_token_header("abc123"), r#"MaaS token="abc123""#);
    }

    #[test]
    fn service_url_resolves_from_billing_id() {
        let transport = Transport::new().unwrap();
        assert_eq!(
            transport.service_url("30012345").unwrap(),
            "https://services.m3.maas360.com"
        );
    }

    #[test]
    fn override_replaces_resolved_url_but_still_validates() {
        let transport = Transport::with_endpoint("http://127.0.0.1:9999/").unwrap();
        assert_eq!(
            transport.service_url("10012345").unwrap(),
            "http://127.0.0.1:9999"
        );
        assert!(matches!(
            transport.service_url("90012345"),
            Err(MaasError::InvalidIdentifier { .. })
        ));
    }

    #[test]
    fn url_appends_encoded_query_pairs() {
        let transport = Transport::new().unwrap();
        let url = transport
            .url(
                "20012345",
                "/device-apis/devices/1.0/sendMessage/20012345",
                [("deviceId", "Appl 1"), ("messageTitle", "Hi & bye")],
            )
            .unwrap();
        assert_eq!(
            url.as_str(),
            "https://services.m2.maas360.com/device-apis/devices/1.0/sendMessage/20012345?deviceId=Appl+1&messageTitle=Hi+%26+bye"
        );
    }

    #[test]
    fn url_without_query_has_no_trailing_question_mark() {
        let transport = Transport::new().unwrap();
        let url = transport
            .url("10012345", "/auth-apis/auth/2.0/authenticate/customer/10012345", [])
            .unwrap();
        assert_eq!(
            url.as_str(),
            "https://services.fiberlink.com/auth-apis/auth/2.0/authenticate/customer/10012345"
        );
    }
}
