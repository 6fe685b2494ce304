//! Error types and status classification for the dispatch core
//!
//! Expected outcomes of a call (HTTP error status, network failure,
//! cancellation) are carried inside the result envelope, not raised through
//! this type. Only failures the caller cannot branch around, such as an
//! interceptor returning an error, propagate as `Err`.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Main error type for dispatch operations
#[derive(Error, Debug)]
pub enum Error {
    /// Network-level transport failure (connect, DNS, invalid URL)
    #[error("transport error: {message}")]
    Transport {
        message: String,
        #[source]
        source: Option<anyhow::Error>,
    },

    /// Non-success HTTP status; the message carries the status text
    #[error("{message}")]
    Status { message: String, status: u16 },

    /// Failure raised by a registered interceptor
    #[error("middleware error: {message}")]
    Middleware {
        message: String,
        #[source]
        source: Option<anyhow::Error>,
    },
}

impl Error {
    /// Interceptor failure with just a message
    pub fn middleware(message: impl Into<String>) -> Self {
        Error::Middleware {
            message: message.into(),
            source: None,
        }
    }
}

impl From<anyhow::Error> for Error {
    fn from(err: anyhow::Error) -> Self {
        Error::Middleware {
            message: err.to_string(),
            source: Some(err),
        }
    }
}

/// Convenience type alias for Results using our Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Classification of an HTTP status code into its protocol range
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StatusClass {
    /// 1xx
    Informational,
    /// 2xx
    Success,
    /// 3xx
    Redirection,
    /// 4xx
    ClientError,
    /// 5xx
    ServerError,
    /// Outside the defined ranges
    Unknown,
}

impl StatusClass {
    /// Classify a numeric status code
    pub fn of(status: u16) -> Self {
        match status {
            100..=199 => StatusClass::Informational,
            200..=299 => StatusClass::Success,
            300..=399 => StatusClass::Redirection,
            400..=499 => StatusClass::ClientError,
            500..=599 => StatusClass::ServerError,
            _ => StatusClass::Unknown,
        }
    }

    /// Whether the status counts as a successful response
    pub fn is_success(self) -> bool {
        matches!(self, StatusClass::Success)
    }
}
