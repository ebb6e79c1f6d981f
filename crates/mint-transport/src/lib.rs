//! HTTP transport abstraction for the Mint API client
//!
//! Provides the request/response descriptors the client builds and a
//! trait-based transport that sends them. Keeping the transport behind a
//! trait lets the client be exercised against a recording mock in tests.
//!
//! # Architecture
//!
//! - **Transport trait**: `send(request) -> response`, one network round trip
//! - **HTTP transport**: REST client via reqwest
//! - **Error handling**: network-level failures only; HTTP error statuses are
//!   returned as ordinary responses for the caller to classify

#![deny(unsafe_code)]
#![warn(missing_docs)]

//! # Usage
//!
//! ```no_run
//! use mint_transport::{HttpRequest, HttpTransport, Transport};
//!
//! # async fn example() -> mint_transport::Result<()> {
//! let transport = HttpTransport::new()?;
//! let request = HttpRequest::get("https://api.mint.me/v5/me")
//!     .with_header("X-Access-Token", "token")
//!     .with_query("scale", "1");
//! let response = transport.send(&request).await?;
//! println!("{} {}", response.status, response.status_text);
//! # Ok(())
//! # }
//! ```

pub mod error;
pub mod http;
pub mod traits;

// Re-export commonly used types
pub use error::{Result, TransportError};
pub use http::{HttpTransport, HttpTransportConfig};
pub use traits::{HttpRequest, HttpResponse, Method, RequestBody, Transport};
