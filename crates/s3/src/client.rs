//! S3 client and retry/redirect controller
//!
//! The controller is an async loop over descriptor generations: dispatch
//! one attempt, classify the delivered status, then either resolve, retry
//! with a decremented budget, or chase the redirect target. Each retry or
//! redirect builds a fresh validated descriptor; nothing mutates in place.

use std::sync::Arc;

use bytes::Bytes;
use http::header::HeaderName;
use http::{HeaderMap, HeaderValue, Method};
use tokio::task::JoinHandle;
use url::Url;

use ow_core::classify::{Disposition, classify};
use ow_core::options::DEFAULT_PERMISSIONS;
use ow_core::{Error, OperationDescriptor, Options, Response, Result};

use crate::sign::{HmacSigner, Sign};
use crate::transport::{HttpTransport, Transport, TransportRequest};

/// Redirect chases allowed per logical operation. Redirects do not spend
/// retry budget, so they carry their own cap to bound a redirect loop.
const MAX_REDIRECTS: u32 = 8;

const X_AMZ_ACL: HeaderName = HeaderName::from_static("x-amz-acl");

/// Which method is in flight and, for PUT, the body to resend
#[derive(Debug, Clone)]
enum Attempt {
    Get,
    Put(Bytes),
    Delete,
}

impl Attempt {
    fn method(&self) -> Method {
        match self {
            Attempt::Get => Method::GET,
            Attempt::Put(_) => Method::PUT,
            Attempt::Delete => Method::DELETE,
        }
    }

    fn body(&self) -> Option<Bytes> {
        match self {
            Attempt::Put(body) => Some(body.clone()),
            _ => None,
        }
    }
}

/// Completion callbacks for the fire-and-forget surface.
///
/// Carried separately from [`Options`] so the per-attempt options value
/// stays plain clonable data. At most one of the two callbacks fires, and
/// at most once per logical operation.
#[derive(Default)]
pub struct Handlers {
    pub on_success: Option<Box<dyn FnOnce(Response) + Send>>,
    pub on_error: Option<Box<dyn FnOnce(Error) + Send>>,
}

impl Handlers {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn on_success(mut self, callback: impl FnOnce(Response) + Send + 'static) -> Self {
        self.on_success = Some(Box::new(callback));
        self
    }

    pub fn on_error(mut self, callback: impl FnOnce(Error) + Send + 'static) -> Self {
        self.on_error = Some(Box::new(callback));
        self
    }
}

/// Asynchronous client for S3-compatible object storage
#[derive(Clone)]
pub struct Client {
    transport: Arc<dyn Transport>,
    signer: Option<Arc<dyn Sign>>,
}

impl Client {
    /// Create a client over the default reqwest transport
    pub fn new() -> Result<Self> {
        Ok(Self {
            transport: Arc::new(HttpTransport::new()?),
            signer: None,
        })
    }

    /// Create a client over a caller-supplied transport
    pub fn with_transport(transport: Arc<dyn Transport>) -> Self {
        Self {
            transport,
            signer: None,
        }
    }

    /// Replace the signing implementation.
    ///
    /// An injected signer authenticates every attempt and owns its own
    /// credentials; the per-request `accessKeyId`/`secretAccessKey` pair is
    /// consulted only by the default [`HmacSigner`] path.
    pub fn with_signer(mut self, signer: Arc<dyn Sign>) -> Self {
        self.signer = Some(signer);
        self
    }

    /// Fetch an object. Resolves with the full response once the
    /// retry/redirect cycle terminates.
    pub async fn get_object(&self, bucket: &str, key: &str, options: Options) -> Result<Response> {
        let descriptor = OperationDescriptor::new(bucket, key, options)?;
        self.execute(descriptor, Attempt::Get).await
    }

    /// Store an object. The body is held for the lifetime of the operation
    /// so retries and redirects can resend identical bytes.
    pub async fn put_object(
        &self,
        bucket: &str,
        key: &str,
        body: impl Into<Bytes>,
        options: Options,
    ) -> Result<Response> {
        let descriptor = OperationDescriptor::new(bucket, key, options)?;
        self.execute(descriptor, Attempt::Put(body.into())).await
    }

    /// Delete an object
    pub async fn delete_object(
        &self,
        bucket: &str,
        key: &str,
        options: Options,
    ) -> Result<Response> {
        let descriptor = OperationDescriptor::new(bucket, key, options)?;
        self.execute(descriptor, Attempt::Delete).await
    }

    /// Callback-style GET: validates synchronously, then returns
    /// immediately with the spawned task's handle. Exactly one of
    /// `handlers.on_success` / `handlers.on_error` fires.
    pub fn get(
        &self,
        bucket: &str,
        key: &str,
        options: Options,
        handlers: Handlers,
    ) -> Result<JoinHandle<()>> {
        let descriptor = OperationDescriptor::new(bucket, key, options)?;
        Ok(self.spawn(descriptor, Attempt::Get, handlers))
    }

    /// Callback-style PUT
    pub fn put(
        &self,
        bucket: &str,
        key: &str,
        body: impl Into<Bytes>,
        options: Options,
        handlers: Handlers,
    ) -> Result<JoinHandle<()>> {
        let descriptor = OperationDescriptor::new(bucket, key, options)?;
        Ok(self.spawn(descriptor, Attempt::Put(body.into()), handlers))
    }

    /// Callback-style DELETE
    pub fn delete(
        &self,
        bucket: &str,
        key: &str,
        options: Options,
        handlers: Handlers,
    ) -> Result<JoinHandle<()>> {
        let descriptor = OperationDescriptor::new(bucket, key, options)?;
        Ok(self.spawn(descriptor, Attempt::Delete, handlers))
    }

    fn spawn(
        &self,
        descriptor: OperationDescriptor,
        attempt: Attempt,
        handlers: Handlers,
    ) -> JoinHandle<()> {
        let client = self.clone();
        tokio::spawn(async move {
            match client.execute(descriptor, attempt).await {
                Ok(response) => {
                    if let Some(on_success) = handlers.on_success {
                        on_success(response);
                    }
                }
                Err(error) => {
                    tracing::error!(error = %error, "operation failed");
                    if let Some(on_error) = handlers.on_error {
                        on_error(error);
                    }
                }
            }
        })
    }

    /// Drive one logical operation across descriptor generations until it
    /// terminates. Attempts are strictly sequential; each generation is a
    /// structurally new descriptor, so no attempt observes another's state.
    async fn execute(
        &self,
        mut descriptor: OperationDescriptor,
        attempt: Attempt,
    ) -> Result<Response> {
        // Dispatches of the retry chain: the first attempt plus every
        // budget-spending retry. Redirect hops are not attempts.
        let mut attempts = 1u32;
        let mut redirects = 0u32;

        loop {
            let response = self.dispatch(&descriptor, &attempt).await?;

            match classify(response.status) {
                Disposition::Success => return Ok(response),
                Disposition::Retry => {
                    if descriptor.options.retry_count == 0 {
                        tracing::error!(
                            status = response.status,
                            attempts,
                            bucket = %descriptor.bucket,
                            key = %descriptor.key,
                            "retry budget exhausted"
                        );
                        return Err(Error::RetriesExhausted { attempts, response });
                    }
                    let mut options = descriptor.options.clone();
                    options.retry_count -= 1;
                    tracing::warn!(
                        status = response.status,
                        remaining = options.retry_count,
                        "retrying after transient error"
                    );
                    descriptor = OperationDescriptor::new(
                        descriptor.bucket.clone(),
                        descriptor.key.clone(),
                        options,
                    )?;
                    attempts += 1;
                }
                Disposition::Redirect => {
                    redirects += 1;
                    if redirects > MAX_REDIRECTS {
                        return Err(Error::RedirectLoop {
                            limit: MAX_REDIRECTS,
                            status: response.status,
                        });
                    }
                    let location = response.location().ok_or_else(|| {
                        Error::RedirectTarget(
                            "redirect response without a Location header".to_string(),
                        )
                    })?;
                    let server = redirect_server(&descriptor.bucket, location)?;
                    tracing::debug!(
                        status = response.status,
                        location,
                        server = %server,
                        "following redirect"
                    );
                    // Only the server moves to the new descriptor; the path
                    // is recomputed by the endpoint resolver on dispatch.
                    let options = descriptor.options.clone().with_server(server);
                    descriptor = OperationDescriptor::new(
                        descriptor.bucket.clone(),
                        descriptor.key.clone(),
                        options,
                    )?;
                }
            }
        }
    }

    /// Fire exactly one attempt through the transport
    async fn dispatch(
        &self,
        descriptor: &OperationDescriptor,
        attempt: &Attempt,
    ) -> Result<Response> {
        let endpoint = descriptor.endpoint();
        let method = attempt.method();

        let amz_headers = acl_headers(descriptor, attempt)?;
        let mut headers = amz_headers.clone();
        match &self.signer {
            Some(signer) => {
                headers.extend(signer.sign(&method, &endpoint.path, &amz_headers)?);
            }
            None => {
                if let (Some(access_key_id), Some(secret_access_key)) = (
                    &descriptor.options.access_key_id,
                    &descriptor.options.secret_access_key,
                ) {
                    let signer = HmacSigner::new(access_key_id, secret_access_key);
                    headers.extend(signer.sign(&method, &endpoint.path, &amz_headers)?);
                }
            }
        }

        let url = endpoint.url(descriptor.options.protocol);
        tracing::debug!(%method, %url, "dispatching request");

        self.transport
            .send(TransportRequest {
                method,
                url,
                headers,
                body: attempt.body(),
                timeout: descriptor.options.timeout,
            })
            .await
    }
}

/// The `x-amz-acl` header, sent only on PUT with a non-default ACL
fn acl_headers(descriptor: &OperationDescriptor, attempt: &Attempt) -> Result<HeaderMap> {
    let mut headers = HeaderMap::new();
    if matches!(attempt, Attempt::Put(_)) && descriptor.options.permissions != DEFAULT_PERMISSIONS {
        let value = HeaderValue::from_str(&descriptor.options.permissions)
            .map_err(|e| Error::Config(format!("invalid ACL value: {e}")))?;
        headers.insert(X_AMZ_ACL, value);
    }
    Ok(headers)
}

/// Derive the next server from a redirect's `Location` target.
///
/// A virtual-hosted target keeps the bucket as a host prefix; a path-style
/// target keeps it as the first path segment. Anything else cannot be
/// related to the bucket being addressed and is fatal.
fn redirect_server(bucket: &str, location: &str) -> Result<String> {
    let url = Url::parse(location)
        .map_err(|e| Error::RedirectTarget(format!("{location}: {e}")))?;
    let host = url
        .host_str()
        .ok_or_else(|| Error::RedirectTarget(format!("{location}: no host")))?;

    if let Some(server) = host.strip_prefix(&format!("{bucket}.")) {
        return Ok(server.to_string());
    }
    if url.path().starts_with(&format!("/{bucket}/")) {
        return Ok(host.to_string());
    }
    Err(Error::RedirectTarget(format!(
        "{location} cannot be related to bucket {bucket}"
    )))
}
