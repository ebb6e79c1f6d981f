//! HTTP transport implementation
//!
//! Provides a reqwest-backed client that implements the Transport trait.
//! Retrying and circuit breaking live above this layer; a transport sends
//! exactly one request per call.

pub mod client;

pub use client::{HttpTransport, HttpTransportConfig};
