//! # Mint API
//!
//! Async Rust client for the Mint mobile-app backend supporting:
//! - Facebook token authorization
//! - Profile discovery, own account, profile lookups and sync
//! - Likes and text messages
//! - Automatic retries with a shared circuit breaker
//!
//! Every call goes through the same pipeline: the circuit breaker wraps a
//! bounded retry loop, which wraps one transport attempt plus response
//! classification. Rejected credentials (401/410) are never retried.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use mint_api::Client;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = Client::new()?;
//!
//!     client.oauth().authorize("facebook-access-token").await?;
//!
//!     for profile in client.profiles().recommendations(52.52, 13.40).await? {
//!         println!("{}", profile.id);
//!     }
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![deny(unsafe_code)]
#![cfg_attr(docsrs, feature(doc_cfg))]

// Re-export commonly used types
pub use client::{Client, MintClientBuilder};
pub use config::{ClientConfig, PacketIdPolicy};
pub use error::{Error, Result};
pub use session::{Credentials, Session};
pub use types::{Authorization, Profile};

// Module declarations
pub mod client;
pub mod config;
pub mod error;
pub mod http;
pub mod observability;
pub mod resources;
pub mod session;
pub mod types;

// Re-export key dependencies for convenience
pub use mint_core::breaker::{CircuitBreakerConfig, CircuitBreakerStats, CircuitState};
pub use serde_json::Value as JsonValue;
pub use tokio_util::sync::CancellationToken;

/// Prelude module for common imports
///
/// # Examples
///
/// ```rust
/// use mint_api::prelude::*;
/// ```
pub mod prelude {
    pub use crate::{
        CircuitBreakerConfig, CircuitState, Client, ClientConfig, Credentials, Error, PacketIdPolicy,
        Result,
        types::{Authorization, Profile},
    };
}

/// Crate version, automatically updated from Cargo.toml
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Default API base URL
pub const DEFAULT_BASE_URL: &str = "https://api.mint.me";

/// User agent of the mobile app release this client mirrors
pub const DEFAULT_USER_AGENT: &str = "Mint-Android/1.10.2";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert_eq!(VERSION, env!("CARGO_PKG_VERSION"));
    }

    #[test]
    fn test_constants() {
        assert_eq!(DEFAULT_BASE_URL, "https://api.mint.me");
        assert!(!DEFAULT_BASE_URL.ends_with('/'));
    }
}
