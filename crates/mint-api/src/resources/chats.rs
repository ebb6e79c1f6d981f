//! Chats API endpoint

use mint_transport::HttpRequest;
use serde_json::{Value, json};
use tokio_util::sync::CancellationToken;

use super::{oauth_header, write};
use crate::{
    client::Client,
    error::{Error, Result},
    observability::log_precondition_failed,
    session::Credentials,
};

/// Chats API resource.
#[derive(Clone, Copy)]
pub struct Chats<'a> {
    client: &'a Client,
    cancel: Option<&'a CancellationToken>,
}

impl<'a> Chats<'a> {
    pub(crate) fn new(client: &'a Client) -> Self {
        Self { client, cancel: None }
    }

    /// Abort calls made through this view once `token` fires.
    pub fn cancellable(mut self, token: &'a CancellationToken) -> Self {
        self.cancel = Some(token);
        self
    }

    /// Send a text message.
    ///
    /// Without a `chat_id` a chat with `user_id` is opened first and the
    /// message goes to the chat the backend returns. Both requests use the
    /// same credentials. The chat id is percent-encoded into the URL path.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidArgument`] if `message` is empty, or if neither a chat
    /// id nor a user id is given.
    pub async fn send_message(&self, user_id: &str, chat_id: Option<&str>, message: &str) -> Result<Value> {
        let chat_id = chat_id.map(str::trim).filter(|id| !id.is_empty());
        let user_id = user_id.trim();

        if chat_id.is_none() && user_id.is_empty() {
            log_precondition_failed("send_message", "no recipient");
            return Err(Error::invalid_argument("a user id or a chat id is required"));
        }
        if message.is_empty() {
            log_precondition_failed("send_message", "empty message");
            return Err(Error::invalid_argument("message is required"));
        }

        let credentials = self.client.session().require()?;

        let chat_id = match chat_id {
            Some(chat_id) => chat_id.to_string(),
            None => self.open_chat(&credentials, user_id).await?,
        };

        let url = self
            .client
            .url_with_segments("/v2/me/chats", &[chat_id.as_str(), "messages", "text"])?;
        let request = HttpRequest::post(url)
            .with_header("Authorization", oauth_header(credentials.access_token()))
            .with_json(json!({
                "packet_id": self.client.config().packet_id.next_id(),
                "message": message,
            }));

        write(self.client, request, self.cancel).await
    }

    async fn open_chat(&self, credentials: &Credentials, user_id: &str) -> Result<String> {
        let request = HttpRequest::post(self.client.url("/v4/me/chats"))
            .with_header("Authorization", oauth_header(credentials.access_token()))
            .with_form([("id", user_id)]);

        let body = write(self.client, request, self.cancel).await?;

        match body.get("id") {
            Some(Value::String(id)) if !id.is_empty() => Ok(id.clone()),
            Some(Value::Number(id)) => Ok(id.to_string()),
            _ => Err(Error::Parse("chat response has no id".into())),
        }
    }
}
