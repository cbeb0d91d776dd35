//! Endpoint resolution
//!
//! Decides between virtual-hosted-style addressing (`{bucket}.{server}`)
//! and path-style addressing (`{server}/{bucket}/...`), and assembles the
//! host/port/path triple for one attempt. Pure functions; validation of the
//! inputs happens at descriptor construction, not here.

use crate::options::Protocol;

/// Resolved request target for a single attempt
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoint {
    pub host: String,
    pub port: u16,
    pub path: String,
}

impl Endpoint {
    /// Full request URL, with the port spelled out explicitly
    pub fn url(&self, protocol: Protocol) -> String {
        format!("{protocol}://{}:{}{}", self.host, self.port, self.path)
    }
}

/// Whether a bucket name qualifies for virtual-hosted-style addressing.
///
/// True iff the name is 3 to 63 characters long and every dot-separated
/// label is lowercase alphanumeric with interior hyphens (DNS label rules).
pub fn dns_compatible(bucket: &str) -> bool {
    if bucket.len() < 3 || bucket.len() > 63 {
        return false;
    }
    bucket.split('.').all(valid_label)
}

fn valid_label(label: &str) -> bool {
    let alnum = |b: u8| b.is_ascii_lowercase() || b.is_ascii_digit();
    let bytes = label.as_bytes();
    match (bytes.first(), bytes.last()) {
        (Some(&first), Some(&last)) => {
            alnum(first) && alnum(last) && bytes.iter().all(|&b| alnum(b) || b == b'-')
        }
        _ => false,
    }
}

/// Resolve the target for `(bucket, key)` against `server`.
///
/// The object key is percent-encoded as a single path segment; a `/` inside
/// the key is encoded rather than treated as a path separator.
pub fn resolve(bucket: &str, key: &str, server: &str, protocol: Protocol) -> Endpoint {
    let key = urlencoding::encode(key);
    if dns_compatible(bucket) {
        Endpoint {
            host: format!("{bucket}.{server}"),
            port: protocol.port(),
            path: format!("/{key}"),
        }
    } else {
        Endpoint {
            host: server.to_string(),
            port: protocol.port(),
            path: format!("/{bucket}/{key}"),
        }
    }
}
