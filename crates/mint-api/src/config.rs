//! Configuration for the Mint client

use mint_core::breaker::CircuitBreakerConfig;
use mint_core::retry::RetryPolicy;
use std::time::Duration;

use crate::{DEFAULT_BASE_URL, DEFAULT_USER_AGENT};

/// Packet id attached to every text message.
///
/// The backend expects a numeric `packet_id` with each message. The mobile
/// app this client speaks for sends one fixed value, which remains the default.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PacketIdPolicy {
    /// Send the same id with every message
    Fixed(u64),
    /// Draw a fresh random id for every message
    Random,
}

impl PacketIdPolicy {
    /// The id observed in traffic from the official app.
    pub const LEGACY: u64 = 4716671047113889394;

    pub(crate) fn next_id(&self) -> u64 {
        match self {
            PacketIdPolicy::Fixed(id) => *id,
            PacketIdPolicy::Random => rand::random(),
        }
    }
}

impl Default for PacketIdPolicy {
    fn default() -> Self {
        PacketIdPolicy::Fixed(Self::LEGACY)
    }
}

/// Configuration for the Mint client.
#[derive(Debug, Clone, PartialEq)]
pub struct ClientConfig {
    /// Base URL for the API
    pub base_url: Option<String>,

    /// `User-Agent` sent with every request
    pub user_agent: String,

    /// Timeout for a single request attempt
    pub timeout: Duration,

    /// Total attempts per call, the first one included
    pub max_attempts: u32,

    /// Fixed wait between attempts
    pub retry_interval: Duration,

    /// Overall time budget per call, measured from the first attempt
    pub retry_timeout: Duration,

    /// Circuit breaker shared by every call of the client
    pub breaker: CircuitBreakerConfig,

    /// How message packet ids are chosen
    pub packet_id: PacketIdPolicy,

    /// Custom headers to include with every request
    pub default_headers: Vec<(String, String)>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        let retry = RetryPolicy::default();
        Self {
            base_url: None,
            user_agent: DEFAULT_USER_AGENT.to_string(),
            timeout: Duration::from_secs(64),
            max_attempts: 2,
            retry_interval: retry.interval(),
            retry_timeout: retry.timeout(),
            breaker: CircuitBreakerConfig::default(),
            packet_id: PacketIdPolicy::default(),
            default_headers: Vec::new(),
        }
    }
}

impl ClientConfig {
    /// Load configuration from environment variables.
    ///
    /// A `.env` file in the working directory is loaded first if present.
    /// This will look for:
    /// - `MINT_BASE_URL` for the API base URL
    /// - `MINT_USER_AGENT` for the user agent
    /// - `MINT_TIMEOUT` for the per-attempt timeout (in seconds)
    /// - `MINT_MAX_ATTEMPTS` for attempts per call
    /// - `MINT_RETRY_INTERVAL_MS` for the wait between attempts
    /// - `MINT_RETRY_TIMEOUT_MS` for the overall retry budget
    /// - `MINT_BREAKER_THRESHOLD` for the breaker failure percentage
    /// - `MINT_BREAKER_COOLDOWN_SECS` for how long the breaker stays open
    ///
    /// Unparseable values are ignored and the default is kept.
    #[cfg(feature = "env")]
    pub fn from_env() -> Result<Self, crate::error::Error> {
        use std::env;

        let _ = dotenvy::dotenv();

        let mut config = Self::default();

        fn parsed<T: std::str::FromStr>(name: &str) -> Option<T> {
            env::var(name).ok().and_then(|value| value.trim().parse().ok())
        }

        // Base URL
        if let Ok(base_url) = env::var("MINT_BASE_URL") {
            config.base_url = Some(base_url);
        }

        if let Ok(user_agent) = env::var("MINT_USER_AGENT") {
            config.user_agent = user_agent;
        }

        // Timeout
        if let Some(timeout_secs) = parsed::<u64>("MINT_TIMEOUT") {
            config.timeout = Duration::from_secs(timeout_secs);
        }

        // Retry
        if let Some(max_attempts) = parsed::<u32>("MINT_MAX_ATTEMPTS") {
            config.max_attempts = max_attempts;
        }
        if let Some(interval_ms) = parsed::<u64>("MINT_RETRY_INTERVAL_MS") {
            config.retry_interval = Duration::from_millis(interval_ms);
        }
        if let Some(timeout_ms) = parsed::<u64>("MINT_RETRY_TIMEOUT_MS") {
            config.retry_timeout = Duration::from_millis(timeout_ms);
        }

        // Circuit breaker
        if let Some(threshold) = parsed::<u8>("MINT_BREAKER_THRESHOLD")
            && threshold <= 100
        {
            config.breaker.threshold = threshold;
        }
        if let Some(cooldown_secs) = parsed::<u64>("MINT_BREAKER_COOLDOWN_SECS") {
            config.breaker.circuit_duration = Duration::from_secs(cooldown_secs);
        }

        Ok(config)
    }

    /// Merge this configuration with another, with the other taking precedence
    /// wherever it differs from the defaults.
    pub fn merge(mut self, other: ClientConfig) -> Self {
        let defaults = ClientConfig::default();

        if other.base_url.is_some() {
            self.base_url = other.base_url;
        }
        if other.user_agent != defaults.user_agent {
            self.user_agent = other.user_agent;
        }
        if other.timeout != defaults.timeout {
            self.timeout = other.timeout;
        }
        if other.max_attempts != defaults.max_attempts {
            self.max_attempts = other.max_attempts;
        }
        if other.retry_interval != defaults.retry_interval {
            self.retry_interval = other.retry_interval;
        }
        if other.retry_timeout != defaults.retry_timeout {
            self.retry_timeout = other.retry_timeout;
        }
        if other.breaker != defaults.breaker {
            self.breaker = other.breaker;
        }
        if other.packet_id != defaults.packet_id {
            self.packet_id = other.packet_id;
        }
        for (key, value) in other.default_headers {
            self.default_headers.retain(|(k, _)| !k.eq_ignore_ascii_case(&key));
            self.default_headers.push((key, value));
        }

        self
    }

    /// The effective base URL, without a trailing slash.
    pub fn base_url(&self) -> &str {
        self.base_url
            .as_deref()
            .unwrap_or(DEFAULT_BASE_URL)
            .trim_end_matches('/')
    }

    /// The retry policy these settings describe.
    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy::builder()
            .max_attempts(self.max_attempts)
            .interval(self.retry_interval)
            .timeout(self.retry_timeout)
            .build()
    }
}
