//! OAuth API endpoint

use mint_transport::HttpRequest;
use tokio_util::sync::CancellationToken;

use super::{require_id, write};
use crate::{client::Client, error::Result, session::Credentials, types::Authorization};

/// OAuth API resource.
///
/// Exchanges a Facebook access token for a Mint session.
#[derive(Clone, Copy)]
pub struct OAuth<'a> {
    client: &'a Client,
    cancel: Option<&'a CancellationToken>,
}

impl<'a> OAuth<'a> {
    pub(crate) fn new(client: &'a Client) -> Self {
        Self { client, cancel: None }
    }

    /// Abort calls made through this view once `token` fires.
    pub fn cancellable(mut self, token: &'a CancellationToken) -> Self {
        self.cancel = Some(token);
        self
    }

    /// Authorize with a Facebook access token.
    ///
    /// The only call that runs without a session. On success the returned
    /// token and user id replace the client's session together; on failure
    /// the session is left untouched.
    ///
    /// # Example
    ///
    /// ```rust,no_run
    /// # async fn example(client: mint_api::Client) -> mint_api::Result<()> {
    /// let auth = client.oauth().authorize("facebook-access-token").await?;
    /// println!("logged in as {}", auth.user_id);
    /// # Ok(())
    /// # }
    /// ```
    pub async fn authorize(&self, facebook_token: &str) -> Result<Authorization> {
        let facebook_token = require_id("authorize", "facebook access token", facebook_token)?;

        let request = HttpRequest::post(self.client.url("/v1/oauth")).with_form([
            ("oauth_provider", "fb"),
            ("oauth_token", facebook_token),
        ]);

        let body = write(self.client, request, self.cancel).await?;
        let authorization: Authorization = serde_json::from_value(body)?;

        self.client.session().set(Credentials::new(
            authorization.access_token.as_str(),
            authorization.user_id.as_str(),
        ));

        tracing::info!(user_id = %authorization.user_id, "Authorized");

        Ok(authorization)
    }
}
