//! ow-s3: HTTP transport, request signing, and the retry/redirect client
//!
//! This crate provides the network-facing half of objectwire:
//! - `Transport` trait with a reqwest-backed default implementation
//! - `Sign` trait with an HMAC-SHA1 signer for static credentials
//! - `Client`, the retry/redirect controller over both seams
//!
//! The request-lifecycle rules (addressing, classification, options) live
//! in `ow-core`; this crate wires them to real I/O.

pub mod client;
pub mod sign;
pub mod transport;

pub use client::{Client, Handlers};
pub use sign::{HmacSigner, Sign};
pub use transport::{HttpTransport, Transport, TransportRequest};
