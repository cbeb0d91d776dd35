//! Per-request configuration
//!
//! Every operation carries its own [`Options`] value. Defaults match the
//! documented surface; raw option maps (e.g. parsed JSON) merge over the
//! defaults via [`Options::from_value`], which rejects unrecognized keys
//! before any network activity.

use std::time::Duration;

use serde::{Deserialize, Deserializer};

use crate::error::{Error, Result};

/// Default storage endpoint host
pub const DEFAULT_SERVER: &str = "s3.amazonaws.com";

/// Default per-attempt timeout
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Default retry budget (additional attempts after the first)
pub const DEFAULT_RETRY_COUNT: u32 = 4;

/// Default canned ACL; requests with this value send no ACL header
pub const DEFAULT_PERMISSIONS: &str = "private";

/// Wire protocol for talking to the storage endpoint
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Protocol {
    /// Plain HTTP on port 80
    Http,
    /// TLS on port 443
    #[default]
    Https,
}

impl Protocol {
    /// The well-known port for this protocol
    pub fn port(self) -> u16 {
        match self {
            Protocol::Http => 80,
            Protocol::Https => 443,
        }
    }
}

impl std::fmt::Display for Protocol {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Protocol::Http => write!(f, "http"),
            Protocol::Https => write!(f, "https"),
        }
    }
}

impl std::str::FromStr for Protocol {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "http" => Ok(Protocol::Http),
            "https" => Ok(Protocol::Https),
            _ => Err(Error::Config(format!("Invalid protocol: {s}"))),
        }
    }
}

/// Per-request options.
///
/// This is the value that travels with an operation descriptor. It is data
/// only (success/error callbacks live in the client's `Handlers`), so each
/// retry or redirect attempt can clone it and override a single field
/// without touching the attempt already in flight.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields, default, rename_all = "camelCase")]
pub struct Options {
    /// Per-attempt timeout, handed to the transport as-is
    #[serde(deserialize_with = "duration_secs")]
    pub timeout: Duration,

    /// Storage endpoint host; required (defaulted, but must stay non-empty)
    pub server: String,

    /// `http` or `https`
    pub protocol: Protocol,

    /// Access key ID; requests are anonymous when absent
    pub access_key_id: Option<String>,

    /// Secret access key; must be configured together with the access key
    pub secret_access_key: Option<String>,

    /// Remaining automatic re-attempts after a retryable response
    pub retry_count: u32,

    /// Canned ACL sent as `x-amz-acl` on PUT when it differs from "private"
    pub permissions: String,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            timeout: DEFAULT_TIMEOUT,
            server: DEFAULT_SERVER.to_string(),
            protocol: Protocol::default(),
            access_key_id: None,
            secret_access_key: None,
            retry_count: DEFAULT_RETRY_COUNT,
            permissions: DEFAULT_PERMISSIONS.to_string(),
        }
    }
}

impl Options {
    /// Create options with all defaults
    pub fn new() -> Self {
        Self::default()
    }

    /// Build options from a raw map, merging supplied keys over the
    /// defaults. Any key outside the recognized set is a configuration
    /// error, reported before any network call.
    pub fn from_value(raw: serde_json::Value) -> Result<Self> {
        let options: Options =
            serde_json::from_value(raw).map_err(|e| Error::Config(e.to_string()))?;
        options.validate()?;
        Ok(options)
    }

    pub fn with_server(mut self, server: impl Into<String>) -> Self {
        self.server = server.into();
        self
    }

    pub fn with_protocol(mut self, protocol: Protocol) -> Self {
        self.protocol = protocol;
        self
    }

    pub fn with_credentials(
        mut self,
        access_key_id: impl Into<String>,
        secret_access_key: impl Into<String>,
    ) -> Self {
        self.access_key_id = Some(access_key_id.into());
        self.secret_access_key = Some(secret_access_key.into());
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_retry_count(mut self, retry_count: u32) -> Self {
        self.retry_count = retry_count;
        self
    }

    pub fn with_permissions(mut self, permissions: impl Into<String>) -> Self {
        self.permissions = permissions.into();
        self
    }

    /// Check cross-field requirements.
    ///
    /// Runs at every descriptor construction, including the ones the retry
    /// and redirect paths build internally, so a malformed rewritten state
    /// fails fast instead of producing a garbage request.
    pub fn validate(&self) -> Result<()> {
        if self.server.is_empty() {
            return Err(Error::Config("server must not be empty".to_string()));
        }
        if self.timeout.is_zero() {
            return Err(Error::Config("timeout must be non-zero".to_string()));
        }
        if self.access_key_id.is_some() != self.secret_access_key.is_some() {
            return Err(Error::Config(
                "accessKeyId and secretAccessKey must be configured together".to_string(),
            ));
        }
        Ok(())
    }
}

fn duration_secs<'de, D>(deserializer: D) -> std::result::Result<Duration, D::Error>
where
    D: Deserializer<'de>,
{
    let secs = u64::deserialize(deserializer)?;
    Ok(Duration::from_secs(secs))
}
