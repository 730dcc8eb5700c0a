//! Request pipeline errors.
//!
//! ERROR HANDLING
//! ==============
//! Every failure is terminal for its call. Server rejections carry the
//! backend's own wording; transport and decode failures display the calling
//! operation's generic fallback message and keep the cause as `source`.

#[cfg(test)]
#[path = "error_test.rs"]
mod error_test;

use serde_json::Value;

use super::api::Operation;

/// Errors produced by [`super::api::ApiClient`] operations.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// The backend answered with a non-success status.
    #[error("{message}")]
    Server { operation: Operation, status: u16, message: String },

    /// The request never produced a response (unreachable, timeout, body read).
    #[error("{}", .operation.fallback_message())]
    Transport {
        operation: Operation,
        #[source]
        source: reqwest::Error,
    },

    /// A success response whose body did not match the expected payload.
    #[error("{}", .operation.fallback_message())]
    Decode {
        operation: Operation,
        #[source]
        source: serde_json::Error,
    },

    /// The held session token cannot be encoded as an HTTP header.
    #[error("session token is not a valid header value")]
    InvalidToken(#[source] reqwest::header::InvalidHeaderValue),

    /// The underlying HTTP client could not be constructed.
    #[error("HTTP client build failed: {0}")]
    HttpClientBuild(#[source] reqwest::Error),
}

impl ApiError {
    /// Build a `Server` error from a raw error body.
    pub(crate) fn from_response(operation: Operation, status: u16, body: &str) -> Self {
        let message = server_message(body).unwrap_or_else(|| operation.fallback_message().to_owned());
        Self::Server { operation, status, message }
    }

    /// True when the backend rejected the request's credential.
    #[must_use]
    pub fn is_unauthorized(&self) -> bool {
        matches!(self, Self::Server { status: 401, .. })
    }

    /// HTTP status for server rejections.
    #[must_use]
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Server { status, .. } => Some(*status),
            _ => None,
        }
    }
}

/// Extract the human-readable message from an error body.
///
/// Accepts `{"detail": "..."}`, the validation shape
/// `{"detail": [{"msg": "..."}, ...]}`, and `{"message": "..."}`.
pub(crate) fn server_message(body: &str) -> Option<String> {
    let value: Value = serde_json::from_str(body).ok()?;
    match value.get("detail") {
        Some(Value::String(detail)) if !detail.trim().is_empty() => return Some(detail.clone()),
        Some(Value::Array(entries)) => {
            let joined = entries
                .iter()
                .filter_map(|entry| entry.get("msg").and_then(Value::as_str))
                .collect::<Vec<_>>()
                .join("; ");
            if !joined.is_empty() {
                return Some(joined);
            }
        }
        _ => {}
    }
    value
        .get("message")
        .and_then(Value::as_str)
        .filter(|message| !message.trim().is_empty())
        .map(ToOwned::to_owned)
}
