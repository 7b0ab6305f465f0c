//! Error types for the people client.
//!
//! # Design
//! Every failure of a public operation lands in one of four variants so
//! callers can branch on the kind instead of matching message text.
//! `RequestFailed` and `InvalidResponseShape` keep the raw body for
//! diagnostics; `Unhandled` keeps the underlying source error intact.

use thiserror::Error;

use crate::http::BoxError;

/// Errors returned by `PeopleClient` operations.
#[derive(Debug, Error)]
pub enum PeopleError {
    /// The server answered with a status outside 200..300.
    #[error("request failed with HTTP {status}")]
    RequestFailed { status: u16, body: String },

    /// The response decoded but lacks the field that identifies its shape.
    #[error("invalid response format: missing `{field}`")]
    InvalidResponseShape { field: &'static str, body: String },

    /// The service document did not yield a routing key.
    #[error("missing server key")]
    MissingServerKey,

    /// Transport, serialization or decoding fault.
    #[error("unhandled error: {0}")]
    Unhandled(#[source] BoxError),
}

impl From<serde_json::Error> for PeopleError {
    fn from(err: serde_json::Error) -> Self {
        PeopleError::Unhandled(Box::new(err))
    }
}

/// Errors from loading an `ApiConfig`.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse config: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("`ApiBaseUrl` is missing or empty")]
    MissingBaseUrl,
}
