//! Typed error hierarchy for the maas360-api crate.
//!
//! Every public operation returns [`Result`], whose error side is
//! [`MaasError`]. The variants follow the boundaries a call crosses:
//!
//! - Caller input is checked before anything touches the network
//!   (`InvalidArgument`, `InvalidIdentifier`, `MissingCredential`).
//! - The transport can fail below HTTP (`Network`) or return a status other
//!   than 200 (`UnexpectedStatus`, which keeps the response body).
//! - A 200 response can still fail to decode (`Parse`) or carry a
//!   business-level failure in its envelope (`RemoteAuth`,
//!   `RemoteActionFailed`), or omit a field the caller relies on
//!   (`IncompleteAuthResponse`, `IncompleteActionResponse`).
//! - Search and dispatch add their own contract failures (`NotFound`,
//!   `ActionNotFound`, `MissingActionParameters`).

use reqwest::StatusCode;

/// Unified error type for all maas360-api library operations.
///
/// `#[source]`/`#[from]` fields keep the cause chain reachable through
/// `Error::source()`.
#[derive(Debug, thiserror::Error)]
pub enum MaasError {
    /// A caller-supplied argument violates a precondition. Raised before any
    /// network access.
    #[error("invalid argument `{field}`: {reason}")]
    InvalidArgument {
        /// Name of the offending parameter.
        field: &'static str,
        /// What is wrong with it.
        reason: String,
    },

    /// The billing ID is empty or its leading digit maps to no known
    /// MaaS360 instance.
    #[error("invalid billing ID {billing_id:?}: no MaaS360 instance for this prefix")]
    InvalidIdentifier {
        /// The rejected billing ID.
        billing_id: String,
    },

    /// Neither a password nor a refresh token was supplied to the
    /// authentication flow.
    #[error("either a password or a refresh token must be provided")]
    MissingCredential,

    /// The auth endpoint answered with error code 0 but left out one of the
    /// tokens.
    #[error("authentication response is missing the {missing}")]
    IncompleteAuthResponse {
        /// Which token was absent (`"auth token"` or `"refresh token"`).
        missing: &'static str,
    },

    /// The auth endpoint returned HTTP 200 with a non-zero `errorCode`.
    #[error("MaaS360 authentication failed: {description} (code: {code})")]
    RemoteAuth {
        /// Vendor error code from `authResponse.errorCode`.
        code: i64,
        /// Vendor description from `authResponse.errorDesc`.
        description: String,
    },

    /// An action-style call returned HTTP 200 with a non-zero action status.
    #[error("MaaS360 action failed (status {status}): {description}")]
    RemoteActionFailed {
        /// Vendor `actionStatus` value.
        status: i64,
        /// Vendor description of the failure.
        description: String,
    },

    /// An action-style call succeeded at the status level but its response
    /// left out a field the operation depends on.
    #[error("action response is missing the {missing}")]
    IncompleteActionResponse {
        /// Which field was absent (`"device ID"`).
        missing: &'static str,
    },

    /// The API returned a status other than 200 OK.
    ///
    /// The body is kept because MaaS360 error pages usually name the
    /// rejected parameter.
    #[error("unexpected HTTP status {status}: {body}")]
    UnexpectedStatus {
        /// The HTTP status code returned by the API.
        status: StatusCode,
        /// Raw response body, or an empty string if it could not be read.
        body: String,
    },

    /// A search returned zero records.
    #[error("no {resource} found")]
    NotFound {
        /// What was being searched for (`"devices"`, `"apps"`, ...).
        resource: &'static str,
    },

    /// The requested action is not in the device's action catalog.
    #[error("action {action_id} is not available for this device")]
    ActionNotFound {
        /// The action ID that was looked up.
        action_id: String,
    },

    /// The action kind needs `additionalParams` but none were given.
    #[error("action {action_id} requires additional parameters")]
    MissingActionParameters {
        /// The action ID that was being dispatched.
        action_id: String,
    },

    /// The response body did not match the expected JSON shape.
    #[error("failed to parse response: {0}")]
    Parse(#[from] serde_json::Error),

    /// A request URL could not be built from the service URL.
    #[error("invalid request URL: {0}")]
    Url(#[from] url::ParseError),

    /// A network-level failure occurred (DNS, TCP, TLS, timeout).
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    /// Writing a report to its sink failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl MaasError {
    /// Shorthand for [`MaasError::InvalidArgument`] with the standard
    /// "must not be empty" reason.
    pub(crate) fn empty(field: &'static str) -> Self {
        MaasError::InvalidArgument {
            field,
            reason: "must not be empty".to_string(),
        }
    }
}

/// Rejects an empty string argument with [`MaasError::InvalidArgument`].
pub(crate) fn require(field: &'static str, value: &str) -> Result<()> {
    if value.is_empty() {
        return Err(MaasError::empty(field));
    }
    Ok(())
}

/// Convenience alias used throughout the library.
pub type Result<T> = std::result::Result<T, MaasError>;
