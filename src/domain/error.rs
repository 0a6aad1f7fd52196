// src/domain/error.rs
use thiserror::Error;

/// The single failure shape of the notes API.
///
/// HTTP errors carry the response status; transport failures (refused
/// connection, malformed URL, undecodable body) do not.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ApiError {
    #[error("{message}")]
    RequestFailed {
        status: Option<u16>,
        message: String,
    },
}

impl ApiError {
    /// Failure for a non-2xx response, preferring the server supplied detail
    pub fn from_status(status: u16, detail: Option<String>) -> Self {
        let message = detail
            .filter(|d| !d.is_empty())
            .unwrap_or_else(|| format!("Request failed ({})", status));
        ApiError::RequestFailed {
            status: Some(status),
            message,
        }
    }

    pub fn transport(message: impl Into<String>) -> Self {
        ApiError::RequestFailed {
            status: None,
            message: message.into(),
        }
    }

    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::RequestFailed { status, .. } => *status,
        }
    }

    pub fn message(&self) -> &str {
        match self {
            ApiError::RequestFailed { message, .. } => message,
        }
    }
}
