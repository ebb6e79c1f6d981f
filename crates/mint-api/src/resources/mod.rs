//! API resource endpoints
//!
//! Each resource is a thin view over the [`Client`](crate::Client): it checks
//! its arguments, then the session, builds a request and hands it to the
//! executor. No request is sent when a check fails.
//!
//! A view made with `cancellable(&token)` aborts its calls once the token
//! fires. The token only affects calls made through that view.

pub mod chats;
pub mod favorites;
pub mod oauth;
pub mod profiles;

pub use chats::Chats;
pub use favorites::Favorites;
pub use oauth::OAuth;
pub use profiles::{Profiles, merge_by_id};

use mint_transport::HttpRequest;
use serde_json::Value;
use tokio_util::sync::CancellationToken;

use crate::client::Client;

/// Header carrying the token for read endpoints.
pub(crate) const ACCESS_TOKEN_HEADER: &str = "X-Access-Token";

/// `Authorization` header value used by write endpoints.
pub(crate) fn oauth_header(access_token: &str) -> String {
    format!("OAuth=\"{access_token}\"")
}

/// GET through the client's executor, stopping early if `cancel` fires.
pub(crate) async fn read(
    client: &Client,
    request: HttpRequest,
    cancel: Option<&CancellationToken>,
) -> crate::Result<Value> {
    match cancel {
        Some(token) => client.executor().read_cancellable(request, token).await,
        None => client.executor().read(request).await,
    }
}

/// POST through the client's executor, stopping early if `cancel` fires.
pub(crate) async fn write(
    client: &Client,
    request: HttpRequest,
    cancel: Option<&CancellationToken>,
) -> crate::Result<Value> {
    match cancel {
        Some(token) => client.executor().write_cancellable(request, token).await,
        None => client.executor().write(request).await,
    }
}

/// Reject empty or whitespace-only identifiers.
pub(crate) fn require_id<'a>(operation: &str, name: &str, value: &'a str) -> crate::Result<&'a str> {
    let value = value.trim();
    if value.is_empty() {
        crate::observability::log_precondition_failed(operation, name);
        return Err(crate::Error::invalid_argument(format!("{name} is required")));
    }
    Ok(value)
}
