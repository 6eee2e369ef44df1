//! REST client for a Sawtooth-style ledger.
//!
//! - `rest_client`: batch submission, status queries, batch retrieval
//! - `poller`: wait for a submitted batch to be committed
//! - `mock`: in-process REST API for tests (`mock` feature)

#[cfg(feature = "mock")]
pub mod mock;
pub mod poller;
pub mod rest_client;

use gitchain_types::{GitchainError, Result};
use url::Url;

pub use poller::BatchPoller;
pub use rest_client::{RestClient, StatusResponse, SubmitResponse};

/// Built-in REST endpoint.
pub const DEFAULT_ENDPOINT: &str = "http://localhost:8008/";

/// Environment variable overriding the built-in endpoint.
pub const ENDPOINT_ENV: &str = "GITCHAIN_REST_ENDPOINT";

/// How long and how often to poll a batch status.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PollPolicy {
    pub interval_ms: u64,
    /// `None` polls until committed, cancelled or past the deadline.
    pub max_attempts: Option<u32>,
    pub deadline_ms: Option<u64>,
}

impl Default for PollPolicy {
    fn default() -> Self {
        Self {
            interval_ms: 500,
            max_attempts: Some(120),
            deadline_ms: None,
        }
    }
}

impl PollPolicy {
    /// Poll forever; only cancellation stops it.
    pub fn unbounded() -> Self {
        Self {
            max_attempts: None,
            deadline_ms: None,
            ..Self::default()
        }
    }

    pub fn with_interval_ms(mut self, interval_ms: u64) -> Self {
        self.interval_ms = interval_ms;
        self
    }

    pub fn with_max_attempts(mut self, max_attempts: u32) -> Self {
        self.max_attempts = Some(max_attempts);
        self
    }

    pub fn with_deadline_ms(mut self, deadline_ms: u64) -> Self {
        self.deadline_ms = Some(deadline_ms);
        self
    }
}

/// Client configuration, resolved once and passed to the client.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Process-wide REST endpoint; a per-call endpoint takes precedence.
    pub endpoint: String,
    pub request_timeout_ms: u64,
    pub poll: PollPolicy,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            request_timeout_ms: 30_000,
            poll: PollPolicy::default(),
        }
    }
}

impl ClientConfig {
    /// Default configuration with the endpoint taken from `GITCHAIN_REST_ENDPOINT`
    /// when it is set.
    pub fn from_env() -> Self {
        Self::with_default_endpoint(std::env::var(ENDPOINT_ENV).ok())
    }

    fn with_default_endpoint(endpoint: Option<String>) -> Self {
        let mut config = Self::default();
        if let Some(endpoint) = endpoint.filter(|e| !e.trim().is_empty()) {
            config.endpoint = endpoint;
        }
        config
    }

    /// Pick the endpoint for one call: explicit argument, then the configured
    /// endpoint.
    pub fn resolve_endpoint(&self, explicit: Option<&str>) -> Result<Url> {
        let endpoint = explicit
            .filter(|e| !e.trim().is_empty())
            .unwrap_or(self.endpoint.as_str());
        parse_base_url(endpoint)
    }
}

/// Parse a REST base URL, normalized to end with `/` so paths append to it.
pub fn parse_base_url(base: &str) -> Result<Url> {
    let mut url = Url::parse(base.trim())
        .map_err(|e| GitchainError::Config(format!("invalid REST endpoint {:?}: {}", base, e)))?;
    if url.cannot_be_a_base() {
        return Err(GitchainError::Config(format!(
            "REST endpoint {:?} cannot be used as a base URL",
            base
        )));
    }
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    Ok(url)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = ClientConfig::default();
        assert_eq!(config.endpoint, DEFAULT_ENDPOINT);
        assert_eq!(config.poll.max_attempts, Some(120));
        assert_eq!(
            config.resolve_endpoint(None).unwrap().as_str(),
            "http://localhost:8008/"
        );
    }

    #[test]
    fn test_endpoint_precedence() {
        let config = ClientConfig::with_default_endpoint(Some("http://ledger:8008".into()));
        assert_eq!(
            config.resolve_endpoint(None).unwrap().as_str(),
            "http://ledger:8008/"
        );
        assert_eq!(
            config.resolve_endpoint(Some("http://override:9000/")).unwrap().as_str(),
            "http://override:9000/"
        );
        assert_eq!(
            config.resolve_endpoint(Some("")).unwrap().as_str(),
            "http://ledger:8008/"
        );

        let config = ClientConfig::with_default_endpoint(Some("  ".into()));
        assert_eq!(config.endpoint, DEFAULT_ENDPOINT);
    }

    #[test]
    fn test_parse_base_url_appends_slash() {
        assert_eq!(parse_base_url("http://h/api").unwrap().as_str(), "http://h/api/");
        assert_eq!(parse_base_url("http://h/api/").unwrap().as_str(), "http://h/api/");
    }

    #[test]
    fn test_parse_base_url_rejects_garbage() {
        assert!(matches!(parse_base_url("not a url"), Err(GitchainError::Config(_))));
        assert!(matches!(parse_base_url("mailto:a@b"), Err(GitchainError::Config(_))));
    }

    #[test]
    fn test_unbounded_policy() {
        let policy = PollPolicy::unbounded().with_interval_ms(10);
        assert_eq!(policy.max_attempts, None);
        assert_eq!(policy.deadline_ms, None);
        assert_eq!(policy.interval_ms, 10);
    }
}
