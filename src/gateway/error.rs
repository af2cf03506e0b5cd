//! Error type for the remote data gateway.
//!
//! Every gateway operation resolves to exactly one `Result`. Failures are
//! split into the three shapes callers need to react to differently:
//! transport failures (no status), application errors (server status plus the
//! `detail` message it sent back), and calls refused locally because there is
//! no session token.

use reqwest::StatusCode;
use thiserror::Error;

use super::envelope::extract_detail;

pub type GatewayResult<T> = std::result::Result<T, GatewayError>;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GatewayError {
    /// Network failure, timeout, or a response body that could not be parsed
    #[error("transport error: {message}")]
    Transport { message: String },

    /// Non-2xx response from the backend
    #[error("{message} (HTTP {})", .status.as_u16())]
    Api { status: StatusCode, message: String },

    /// No bearer token is available; the call never left the client
    #[error("not signed in (run: schooldesk login <token>)")]
    Unauthenticated,
}

impl GatewayError {
    pub fn transport(message: impl Into<String>) -> Self {
        GatewayError::Transport {
            message: message.into(),
        }
    }

    /// Build an application error from a failed response.
    ///
    /// The message comes from the JSON `detail` field when the body has one,
    /// falling back to the status' canonical reason.
    pub fn from_response(status: StatusCode, body: &str) -> Self {
        let message = extract_detail(body).unwrap_or_else(|| {
            status
                .canonical_reason()
                .unwrap_or("request failed")
                .to_string()
        });
        GatewayError::Api { status, message }
    }

    /// HTTP status, if the failure came from a server response
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            GatewayError::Api { status, .. } => Some(*status),
            _ => None,
        }
    }

    pub fn is_transport(&self) -> bool {
        matches!(self, GatewayError::Transport { .. })
    }

    /// Short text suitable for a transient status message
    pub fn user_message(&self) -> String {
        match self {
            GatewayError::Transport { message } => format!("Network error: {message}"),
            GatewayError::Api { message, .. } => message.clone(),
            GatewayError::Unauthenticated => "Not signed in".to_string(),
        }
    }
}

impl From<reqwest::Error> for GatewayError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            return GatewayError::transport("request timed out");
        }
        if err.is_decode() {
            return GatewayError::transport(format!("malformed response: {err}"));
        }
        GatewayError::transport(err.to_string())
    }
}

impl From<serde_json::Error> for GatewayError {
    fn from(err: serde_json::Error) -> Self {
        GatewayError::transport(format!("malformed JSON response: {err}"))
    }
}
