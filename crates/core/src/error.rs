//! Error types for objectwire
//!
//! All fallible operations in this workspace return [`Result`] with this
//! crate's [`Error`]. Configuration problems are surfaced synchronously at
//! descriptor construction; everything else arrives when an operation
//! terminates.

use thiserror::Error;

use crate::response::Response;

/// Result type alias using the objectwire error type
pub type Result<T> = std::result::Result<T, Error>;

/// Errors produced by the objectwire client
#[derive(Error, Debug)]
pub enum Error {
    /// Invalid or unrecognized configuration; never retried
    #[error("Configuration error: {0}")]
    Config(String),

    /// Transport-level failure (connection, TLS, timeout); the request may
    /// never have reached the server, so it is not retried
    #[error("Network error: {0}")]
    Transport(String),

    /// Request signing failed
    #[error("Signing error: {0}")]
    Sign(String),

    /// A redirect response carried a target that cannot be related to the
    /// bucket being addressed
    #[error("Unusable redirect target: {0}")]
    RedirectTarget(String),

    /// The redirect-following cap was reached without leaving 3xx territory
    #[error("Redirect limit reached after {limit} redirects (last status {status})")]
    RedirectLoop { limit: u32, status: u16 },

    /// The retry budget ran out while the server kept answering with a
    /// retryable status; carries the last response for inspection.
    /// `attempts` counts the first dispatch plus every budget-spending
    /// retry; redirect hops are not attempts.
    #[error("Retry budget exhausted after {attempts} attempts (last status {})", response.status)]
    RetriesExhausted { attempts: u32, response: Response },
}

impl Error {
    /// The last delivered HTTP response, when the error carries one
    pub fn response(&self) -> Option<&Response> {
        match self {
            Error::RetriesExhausted { response, .. } => Some(response),
            _ => None,
        }
    }
}
