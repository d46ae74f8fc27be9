//! Failure taxonomy for backend requests and the messages shown to the user.

use thiserror::Error;

/// Message shown when the backend cannot be reached at all.
pub const TRANSPORT_MESSAGE: &str =
    "Failed to reach the analysis service. Check that the backend is running.";

/// Message shown when a successful response body cannot be decoded.
pub const DECODE_MESSAGE: &str = "The analysis service returned an unreadable response.";

/// Everything that can go wrong between the URL box and a rendered result.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FetchError {
    /// Client-side validation failure. Never sent to the network.
    #[error("{0}")]
    InvalidUrl(String),

    /// DNS, connection, TLS or I/O failure before a status line was read.
    #[error("transport error: {0}")]
    Transport(String),

    /// Non-2xx response. `message` is already resolved from the body
    /// (`detail` or `message`) or falls back to `HTTP error {status}`.
    #[error("{message}")]
    Status { status: u16, message: String },

    /// 2xx response whose body is not the expected JSON shape.
    #[error("decode error: {0}")]
    Decode(String),
}

impl FetchError {
    /// The text displayed to the user for this error.
    ///
    /// Transport and decode failures map to generic messages; the underlying
    /// detail is only logged.
    pub fn user_message(&self) -> String {
        match self {
            Self::InvalidUrl(msg) => msg.clone(),
            Self::Transport(_) => TRANSPORT_MESSAGE.to_string(),
            Self::Status { message, .. } => message.clone(),
            Self::Decode(_) => DECODE_MESSAGE.to_string(),
        }
    }

    /// HTTP status for the error, if the backend produced one.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Status { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Whether the error was caught before any request was issued.
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::InvalidUrl(_))
    }
}
