//! Delivered HTTP response

use bytes::Bytes;
use http::HeaderMap;
use http::header::LOCATION;

/// A fully delivered HTTP response: status line, headers, and collected body.
///
/// Any status code can appear here, including 4xx/5xx; a `Response` only
/// exists when the transport actually received an answer from the server.
#[derive(Debug, Clone, Default)]
pub struct Response {
    pub status: u16,
    pub headers: HeaderMap,
    pub body: Bytes,
}

impl Response {
    /// The `Location` header as a string, if present and valid UTF-8
    pub fn location(&self) -> Option<&str> {
        self.headers.get(LOCATION)?.to_str().ok()
    }
}
