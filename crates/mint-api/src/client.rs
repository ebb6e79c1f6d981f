//! Main client implementation for the Mint API

use std::sync::Arc;
use std::time::Duration;

use mint_core::breaker::{CircuitBreaker, CircuitBreakerConfig};
use mint_transport::{HttpTransport, HttpTransportConfig, Transport};

use crate::{
    config::{ClientConfig, PacketIdPolicy},
    error::{Error, Result},
    http::RequestExecutor,
    resources::{Chats, Favorites, OAuth, Profiles},
    session::{Credentials, Session},
};

/// Main client for interacting with the Mint API.
///
/// Cloning is cheap and clones share everything: the session, the circuit
/// breaker and the connection pool.
///
/// Calls can be cancelled one at a time: a resource view made with
/// `cancellable(&token)`, e.g. `client.profiles().cancellable(&token)`, stops
/// its calls with [`Error::Cancelled`] once the token fires. Other calls on
/// the client are unaffected.
///
/// # Example
///
/// ```rust,no_run
/// use mint_api::Client;
///
/// # async fn example() -> mint_api::Result<()> {
/// let client = Client::new()?;
/// client.oauth().authorize("facebook-access-token").await?;
///
/// let profiles = client.profiles().recommendations(52.52, 13.40).await?;
/// for profile in &profiles {
///     client.favorites().like(&profile.id).await?;
/// }
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct Client {
    inner: Arc<ClientInner>,
}

struct ClientInner {
    config: ClientConfig,
    base_url: String,
    executor: RequestExecutor,
    session: Session,
}

impl Client {
    /// Create a client with the default configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be initialized.
    pub fn new() -> Result<Self> {
        Self::builder().build()
    }

    /// Create a new client builder for advanced configuration.
    pub fn builder() -> MintClientBuilder {
        MintClientBuilder::default()
    }

    /// Create a client configured from `MINT_*` environment variables.
    ///
    /// See [`ClientConfig::from_env`].
    #[cfg(feature = "env")]
    pub fn from_env() -> Result<Self> {
        Self::from_config(ClientConfig::from_env()?)
    }

    /// Create a client from a configuration object.
    ///
    /// # Errors
    ///
    /// Returns an error if the base URL is invalid or the HTTP client cannot
    /// be initialized.
    pub fn from_config(config: ClientConfig) -> Result<Self> {
        let transport = http_transport(&config)?;
        Self::assemble(config, transport)
    }

    fn assemble(config: ClientConfig, transport: Arc<dyn Transport>) -> Result<Self> {
        let base_url = validate_base_url(config.base_url())?;

        let breaker = Arc::new(CircuitBreaker::new(config.breaker.clone()));
        let executor = RequestExecutor::new(transport, config.retry_policy(), breaker);

        Ok(Self {
            inner: Arc::new(ClientInner {
                config,
                base_url,
                executor,
                session: Session::new(),
            }),
        })
    }

    /// Access the OAuth API endpoint.
    pub fn oauth(&self) -> OAuth<'_> {
        OAuth::new(self)
    }

    /// Access the Profiles API endpoints.
    pub fn profiles(&self) -> Profiles<'_> {
        Profiles::new(self)
    }

    /// Access the Chats API endpoint.
    pub fn chats(&self) -> Chats<'_> {
        Chats::new(self)
    }

    /// Access the Favorites API endpoint.
    pub fn favorites(&self) -> Favorites<'_> {
        Favorites::new(self)
    }

    /// The circuit breaker shared by every call of this client.
    pub fn circuit_breaker(&self) -> &CircuitBreaker {
        self.inner.executor.breaker()
    }

    /// A snapshot of the current session credentials.
    pub fn credentials(&self) -> Option<Credentials> {
        self.inner.session.credentials()
    }

    /// Restore a session, e.g. a token persisted from an earlier run.
    pub fn set_credentials(&self, credentials: Credentials) {
        self.inner.session.set(credentials);
    }

    /// Whether the client holds credentials.
    pub fn is_authorized(&self) -> bool {
        self.inner.session.is_authorized()
    }

    /// The configuration this client was built with.
    pub fn config(&self) -> &ClientConfig {
        &self.inner.config
    }

    /// Get the base URL for the API
    pub fn base_url(&self) -> &str {
        &self.inner.base_url
    }

    pub(crate) fn url(&self, path: &str) -> String {
        format!("{}{}", self.inner.base_url, path)
    }

    /// `path` followed by `segments`, each percent-encoded as a single path
    /// segment.
    pub(crate) fn url_with_segments(&self, path: &str, segments: &[&str]) -> Result<String> {
        let mut url = url::Url::parse(&self.url(path))?;
        url.path_segments_mut()
            .map_err(|()| Error::InvalidUrl(format!("{} cannot have path segments", self.inner.base_url)))?
            .extend(segments);
        Ok(url.into())
    }

    pub(crate) fn executor(&self) -> &RequestExecutor {
        &self.inner.executor
    }

    pub(crate) fn session(&self) -> &Session {
        &self.inner.session
    }
}

impl std::fmt::Debug for Client {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Client")
            .field("base_url", &self.inner.base_url)
            .field("executor", &self.inner.executor)
            .field("authorized", &self.is_authorized())
            .finish()
    }
}

fn http_transport(config: &ClientConfig) -> Result<Arc<dyn Transport>> {
    let transport = HttpTransport::with_config(HttpTransportConfig {
        timeout: config.timeout,
        user_agent: Some(config.user_agent.clone()),
        default_headers: config.default_headers.clone(),
        ..Default::default()
    })
    .map_err(|e| Error::HttpClient(e.to_string()))?;

    Ok(Arc::new(transport))
}

fn validate_base_url(base_url: &str) -> Result<String> {
    let trimmed = base_url.trim();
    if trimmed.is_empty() {
        return Err(Error::InvalidUrl("base URL is empty".into()));
    }

    let parsed = url::Url::parse(trimmed)?;
    if !matches!(parsed.scheme(), "http" | "https") {
        return Err(Error::InvalidUrl(format!(
            "unsupported scheme '{}', expected http or https",
            parsed.scheme()
        )));
    }

    Ok(trimmed.trim_end_matches('/').to_string())
}

/// Builder for creating a configured Client.
#[derive(Default)]
pub struct MintClientBuilder {
    config: ClientConfig,
    transport: Option<Arc<dyn Transport>>,
    credentials: Option<Credentials>,
}

impl MintClientBuilder {
    /// Start from an existing configuration.
    pub fn config(mut self, config: ClientConfig) -> Self {
        self.config = config;
        self
    }

    /// Set the base URL for the API.
    pub fn base_url(mut self, base_url: impl Into<String>) -> Self {
        self.config.base_url = Some(base_url.into());
        self
    }

    /// Set the `User-Agent` header.
    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.config.user_agent = user_agent.into();
        self
    }

    /// Set the timeout of a single request attempt.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.config.timeout = timeout;
        self
    }

    /// Set the total number of attempts per call.
    pub fn max_attempts(mut self, max_attempts: u32) -> Self {
        self.config.max_attempts = max_attempts;
        self
    }

    /// Set the wait between attempts.
    pub fn retry_interval(mut self, interval: Duration) -> Self {
        self.config.retry_interval = interval;
        self
    }

    /// Set the overall time budget of a call.
    pub fn retry_timeout(mut self, timeout: Duration) -> Self {
        self.config.retry_timeout = timeout;
        self
    }

    /// Set the circuit breaker configuration.
    pub fn circuit_breaker(mut self, config: CircuitBreakerConfig) -> Self {
        self.config.breaker = config;
        self
    }

    /// Choose how message packet ids are generated.
    pub fn packet_id(mut self, policy: PacketIdPolicy) -> Self {
        self.config.packet_id = policy;
        self
    }

    /// Add a custom default header.
    pub fn default_header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.config.default_headers.push((key.into(), value.into()));
        self
    }

    /// Start with a restored session.
    pub fn credentials(mut self, credentials: Credentials) -> Self {
        self.credentials = Some(credentials);
        self
    }

    /// Use a custom transport instead of the built-in HTTP client.
    ///
    /// The user agent, per-attempt timeout and default headers are then up to
    /// the transport.
    pub fn transport(mut self, transport: Arc<dyn Transport>) -> Self {
        self.transport = Some(transport);
        self
    }

    /// Build the client with the configured options.
    pub fn build(self) -> Result<Client> {
        let transport = match self.transport {
            Some(transport) => transport,
            None => http_transport(&self.config)?,
        };
        let client = Client::assemble(self.config, transport)?;

        if let Some(credentials) = self.credentials {
            client.set_credentials(credentials);
        }

        Ok(client)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_builder() {
        let client = Client::builder()
            .base_url("https://example.com/")
            .timeout(Duration::from_secs(30))
            .max_attempts(3)
            .build()
            .expect("Failed to build client");

        assert_eq!(client.base_url(), "https://example.com");
        assert_eq!(client.url("/v5/me"), "https://example.com/v5/me");
        assert_eq!(client.config().max_attempts, 3);
    }

    #[test]
    fn test_url_with_segments_escapes() {
        let client = Client::builder().base_url("http://mint.test/").build().unwrap();

        assert_eq!(
            client.url_with_segments("/v2/me/chats", &["77", "messages", "text"]).unwrap(),
            "http://mint.test/v2/me/chats/77/messages/text"
        );
        assert_eq!(
            client.url_with_segments("/v2/me/chats", &["a/b?c#d", "messages"]).unwrap(),
            "http://mint.test/v2/me/chats/a%2Fb%3Fc%23d/messages"
        );
    }

    #[test]
    fn test_default_base_url() {
        let client = Client::new().unwrap();
        assert_eq!(client.base_url(), "https://api.mint.me");
        assert!(!client.is_authorized());
    }

    #[test]
    fn test_client_from_config_invalid_scheme() {
        let config = ClientConfig {
            base_url: Some("ftp://invalid.example.com".to_string()),
            ..Default::default()
        };

        match Client::from_config(config) {
            Err(Error::InvalidUrl(msg)) => {
                assert!(msg.contains("ftp"), "Error should mention invalid scheme");
                assert!(msg.contains("http"), "Error should mention valid schemes");
            }
            other => panic!("Expected InvalidUrl error, got {other:?}"),
        }
    }

    #[test]
    fn test_client_from_config_empty_url() {
        let config = ClientConfig {
            base_url: Some("   ".to_string()),
            ..Default::default()
        };

        match Client::from_config(config) {
            Err(Error::InvalidUrl(msg)) => assert!(msg.contains("empty")),
            other => panic!("Expected InvalidUrl error for empty URL, got {other:?}"),
        }
    }

    #[test]
    fn test_clones_share_session() {
        let client1 = Client::new().unwrap();
        let client2 = client1.clone();

        client1.set_credentials(Credentials::new("token", "7"));

        let credentials = client2.credentials().expect("session should be shared");
        assert_eq!(credentials.access_token(), "token");
        assert_eq!(credentials.user_id(), "7");
        assert!(std::ptr::eq(
            client1.circuit_breaker(),
            client2.circuit_breaker()
        ));
    }

    #[test]
    fn test_builder_restores_credentials() {
        let client = Client::builder()
            .credentials(Credentials::new("persisted", "99"))
            .build()
            .unwrap();

        assert!(client.is_authorized());
        assert_eq!(client.credentials().unwrap().user_id(), "99");
    }

    #[test]
    fn test_debug_hides_token() {
        let client = Client::builder()
            .credentials(Credentials::new("secret-token", "1"))
            .build()
            .unwrap();

        assert!(!format!("{client:?}").contains("secret-token"));
    }
}
