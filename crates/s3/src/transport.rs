//! Asynchronous HTTP transport
//!
//! The client consumes the transport through the [`Transport`] trait: hand
//! over method/url/headers/body, get back a delivered [`Response`] or a
//! transport error. Connection handling, TLS, and pooling all live behind
//! this seam. [`HttpTransport`] is the reqwest-backed default.

use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;
use http::{HeaderMap, Method};

use ow_core::{Error, Response, Result};

/// Everything the transport needs for one outbound call
#[derive(Debug, Clone)]
pub struct TransportRequest {
    pub method: Method,
    pub url: String,
    pub headers: HeaderMap,
    pub body: Option<Bytes>,
    pub timeout: Duration,
}

/// Issues exactly one HTTP call per `send`.
///
/// Implementations report two mutually exclusive outcomes: `Ok` with the
/// delivered response for any status code (4xx/5xx included), or
/// [`Error::Transport`] when no response arrived at all. No retry logic
/// belongs here.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn send(&self, request: TransportRequest) -> Result<Response>;
}

/// Default transport backed by a shared reqwest client.
///
/// Redirect following is disabled: 3xx responses must surface to the
/// retry/redirect controller, which owns `Location` handling.
pub struct HttpTransport {
    client: reqwest::Client,
}

impl HttpTransport {
    pub fn new() -> Result<Self> {
        let client = reqwest::Client::builder()
            .redirect(reqwest::redirect::Policy::none())
            .build()
            .map_err(|e| Error::Transport(e.to_string()))?;
        Ok(Self { client })
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn send(&self, request: TransportRequest) -> Result<Response> {
        let mut builder = self
            .client
            .request(request.method, request.url)
            .timeout(request.timeout)
            .headers(request.headers);

        if let Some(body) = request.body {
            builder = builder.body(body);
        }

        let response = builder
            .send()
            .await
            .map_err(|e| Error::Transport(e.to_string()))?;

        let status = response.status().as_u16();
        let headers = response.headers().clone();
        let body = response
            .bytes()
            .await
            .map_err(|e| Error::Transport(e.to_string()))?;

        Ok(Response {
            status,
            headers,
            body,
        })
    }
}
