//! HTTP request execution
//!
//! [`RequestExecutor`] is the only component that talks to the transport.
//! [`classify`] decides what each response means.

pub mod classifier;
pub mod executor;

pub use classifier::{ResponseOutcome, classify};
pub use executor::RequestExecutor;
