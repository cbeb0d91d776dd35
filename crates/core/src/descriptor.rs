//! Operation descriptor
//!
//! The immutable value a single attempt runs against. The first descriptor
//! comes from the caller; retries and redirects build fresh descriptors via
//! copy-with-override and go through the same validating constructor, so no
//! attempt ever observes a half-updated state.

use crate::endpoint::{self, Endpoint};
use crate::error::{Error, Result};
use crate::options::Options;

/// One bucket/key operation with its per-request options.
///
/// Read-only once built; a retry or redirect discards the current
/// descriptor and constructs the next generation.
#[derive(Debug, Clone, PartialEq)]
pub struct OperationDescriptor {
    pub bucket: String,
    pub key: String,
    pub options: Options,
}

impl OperationDescriptor {
    /// Validate and build a descriptor.
    ///
    /// Fails with [`Error::Config`] on an empty bucket or key, or when the
    /// options fail their own validation.
    pub fn new(
        bucket: impl Into<String>,
        key: impl Into<String>,
        options: Options,
    ) -> Result<Self> {
        let bucket = bucket.into();
        let key = key.into();
        if bucket.is_empty() {
            return Err(Error::Config("bucket name must not be empty".to_string()));
        }
        if key.is_empty() {
            return Err(Error::Config("object key must not be empty".to_string()));
        }
        options.validate()?;
        Ok(Self {
            bucket,
            key,
            options,
        })
    }

    /// Resolve the request target for this descriptor
    pub fn endpoint(&self) -> Endpoint {
        endpoint::resolve(
            &self.bucket,
            &self.key,
            &self.options.server,
            self.options.protocol,
        )
    }

    /// Full request URL for this descriptor
    pub fn url(&self) -> String {
        self.endpoint().url(self.options.protocol)
    }
}
