//! Error handling for the Barzinhos Rust client

use std::fmt;
use thiserror::Error;

/// Unified error type for the Barzinhos Rust client
#[derive(Error, Debug)]
pub enum Error {
    /// Network or transport related errors
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON serialization or deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Non-2xx API response carrying the server-provided message
    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    /// HTTP 401 — the session has been invalidated
    #[error("unauthorized: {message}")]
    Unauthorized { message: String },

    /// Client-side validation failure, detected before any request is sent
    #[error("validation error: {0}")]
    Validation(String),

    /// URL parsing errors
    #[error("URL error: {0}")]
    Url(#[from] url::ParseError),

    /// Session persistence I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Create a new API error
    pub fn api<T: fmt::Display>(status: u16, msg: T) -> Self {
        Error::Api {
            status,
            message: msg.to_string(),
        }
    }

    /// Create a new validation error
    pub fn validation<T: fmt::Display>(msg: T) -> Self {
        Error::Validation(msg.to_string())
    }

    /// True for any non-2xx response, the 401 case included
    pub fn is_api_error(&self) -> bool {
        matches!(self, Error::Api { .. } | Error::Unauthorized { .. })
    }
}
