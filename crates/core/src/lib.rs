//! ow-core: Core library for the objectwire S3 client
//!
//! This crate provides the network-free half of the client, including:
//! - Per-request options with defaults and validation
//! - Virtual-hosted vs. path-style endpoint resolution
//! - Response-status classification
//! - The immutable per-attempt operation descriptor
//!
//! It is independent of any HTTP transport or signing implementation,
//! allowing the request-lifecycle logic to be tested without a network.

pub mod classify;
pub mod descriptor;
pub mod endpoint;
pub mod error;
pub mod options;
pub mod response;

pub use classify::{Disposition, classify};
pub use descriptor::OperationDescriptor;
pub use endpoint::{Endpoint, dns_compatible, resolve};
pub use error::{Error, Result};
pub use options::{Options, Protocol};
pub use response::Response;
