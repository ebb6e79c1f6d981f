//! Favorites API endpoint

use mint_transport::HttpRequest;
use serde_json::Value;
use tokio_util::sync::CancellationToken;

use super::{oauth_header, require_id, write};
use crate::{client::Client, error::Result};

/// Favorites API resource.
#[derive(Clone, Copy)]
pub struct Favorites<'a> {
    client: &'a Client,
    cancel: Option<&'a CancellationToken>,
}

impl<'a> Favorites<'a> {
    pub(crate) fn new(client: &'a Client) -> Self {
        Self { client, cancel: None }
    }

    /// Abort calls made through this view once `token` fires.
    pub fn cancellable(mut self, token: &'a CancellationToken) -> Self {
        self.cancel = Some(token);
        self
    }

    /// Like a user.
    pub async fn like(&self, user_id: &str) -> Result<Value> {
        let user_id = require_id("like", "user id", user_id)?;
        let credentials = self.client.session().require()?;

        let request = HttpRequest::post(self.client.url("/v5/me/favorites"))
            .with_header("Authorization", oauth_header(credentials.access_token()))
            .with_form([("id", user_id)]);

        write(self.client, request, self.cancel).await
    }

    /// Pass on a user. The backend has no such endpoint; this always succeeds
    /// without a request.
    pub async fn pass(&self) -> Result<()> {
        Ok(())
    }
}
