//! Service configuration
//!
//! Defines where requests are sent, how they are authenticated, and how long
//! the client waits for accepted requests to finish.

use pangea_core::{PollConfig, StatusCodes};
use std::time::Duration;

use crate::error::{ClientError, Result};

/// Default API domain
pub const DEFAULT_DOMAIN: &str = "aws.us.pangea.cloud";

/// Placeholder replaced by the service name in `base_url_template`
pub const SERVICE_NAME_PLACEHOLDER: &str = "{SERVICE_NAME}";

/// Deployment environment
///
/// In `Local` the service name is not prepended to the domain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Environment {
    #[default]
    Production,
    Local,
}

impl std::str::FromStr for Environment {
    type Err = ClientError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "production" => Ok(Self::Production),
            "local" => Ok(Self::Local),
            other => Err(ClientError::invalid_config(format!(
                "unknown environment '{}', expected 'production' or 'local'",
                other
            ))),
        }
    }
}

/// Service configuration
#[derive(Debug, Clone)]
pub struct ServiceConfig {
    /// Bearer token sent with every request
    pub token: String,

    /// Base domain. May also be a full `http(s)://` URL.
    pub domain: String,

    /// Full base URL with a `{SERVICE_NAME}` placeholder. Wins over `domain`.
    pub base_url_template: Option<String>,

    /// Use plain HTTP when building URLs from `domain`
    pub insecure: bool,

    pub environment: Environment,

    /// Maximum time a single HTTP request may take
    pub request_timeout: Duration,

    /// Whether accepted requests are polled automatically
    pub queued_retry_enabled: bool,

    /// How accepted requests are polled
    pub poll: PollConfig,

    /// Appended to the default User-Agent
    pub custom_user_agent: Option<String>,

    /// Injected into request payloads that do not carry one
    pub config_id: Option<String>,

    /// HTTP codes of the remote contract
    pub status_codes: StatusCodes,
}

impl ServiceConfig {
    /// Creates a new configuration with defaults
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            token: token.into(),
            domain: DEFAULT_DOMAIN.to_string(),
            base_url_template: None,
            insecure: false,
            environment: Environment::Production,
            request_timeout: Duration::from_secs(5),
            queued_retry_enabled: true,
            poll: PollConfig::default(),
            custom_user_agent: None,
            config_id: None,
            status_codes: StatusCodes::default(),
        }
    }

    /// Creates configuration from environment variables
    ///
    /// Expected environment variables:
    /// - PANGEA_TOKEN (required)
    /// - PANGEA_DOMAIN (optional, default: aws.us.pangea.cloud)
    /// - PANGEA_BASE_URL_TEMPLATE (optional)
    /// - PANGEA_INSECURE (optional, default: false)
    /// - PANGEA_ENVIRONMENT (optional, production|local)
    /// - PANGEA_REQUEST_TIMEOUT_MS (optional, default: 5000)
    /// - PANGEA_QUEUED_RETRY_ENABLED (optional, default: true)
    /// - PANGEA_POLL_TIMEOUT_MS (optional, default: 120000)
    /// - PANGEA_POLL_INTERVAL_MS (optional, default: 1000)
    /// - PANGEA_CONFIG_ID (optional)
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`from_env`](Self::from_env), reading values through `lookup`
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let token = lookup("PANGEA_TOKEN")
            .ok_or_else(|| ClientError::invalid_config("PANGEA_TOKEN environment variable not set"))?;

        let mut config = Self::new(token);

        if let Some(domain) = lookup("PANGEA_DOMAIN") {
            config.domain = domain;
        }

        config.base_url_template = lookup("PANGEA_BASE_URL_TEMPLATE");
        config.config_id = lookup("PANGEA_CONFIG_ID");

        config.insecure = lookup("PANGEA_INSECURE")
            .and_then(|s| parse_bool(&s))
            .unwrap_or(false);

        if let Some(env) = lookup("PANGEA_ENVIRONMENT") {
            config.environment = env.parse()?;
        }

        config.request_timeout = lookup("PANGEA_REQUEST_TIMEOUT_MS")
            .and_then(|s| s.parse::<u64>().ok())
            .map(Duration::from_millis)
            .unwrap_or(config.request_timeout);

        config.queued_retry_enabled = lookup("PANGEA_QUEUED_RETRY_ENABLED")
            .and_then(|s| parse_bool(&s))
            .unwrap_or(true);

        config.poll.timeout = lookup("PANGEA_POLL_TIMEOUT_MS")
            .and_then(|s| s.parse::<u64>().ok())
            .map(Duration::from_millis)
            .unwrap_or(config.poll.timeout);

        if let Some(interval) = lookup("PANGEA_POLL_INTERVAL_MS")
            .and_then(|s| s.parse::<u64>().ok())
            .map(Duration::from_millis)
        {
            config.poll.interval = interval;
            config.poll.max_interval = config.poll.max_interval.max(interval);
        }

        Ok(config)
    }

    pub fn with_domain(mut self, domain: impl Into<String>) -> Self {
        self.domain = domain.into();
        self
    }

    pub fn with_base_url_template(mut self, template: impl Into<String>) -> Self {
        self.base_url_template = Some(template.into());
        self
    }

    pub fn with_environment(mut self, environment: Environment) -> Self {
        self.environment = environment;
        self
    }

    pub fn with_insecure(mut self, insecure: bool) -> Self {
        self.insecure = insecure;
        self
    }

    pub fn with_poll(mut self, poll: PollConfig) -> Self {
        self.poll = poll;
        self
    }

    pub fn with_queued_retry(mut self, enabled: bool) -> Self {
        self.queued_retry_enabled = enabled;
        self
    }

    pub fn with_custom_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.custom_user_agent = Some(user_agent.into());
        self
    }

    pub fn with_config_id(mut self, config_id: impl Into<String>) -> Self {
        self.config_id = Some(config_id.into());
        self
    }

    /// Builds the URL for `path` on the given service
    pub fn url(&self, service: &str, path: &str) -> String {
        let path = path.trim_start_matches('/');

        if let Some(template) = &self.base_url_template {
            let base = template.replace(SERVICE_NAME_PLACEHOLDER, service);
            return format!("{}/{}", base.trim_end_matches('/'), path);
        }

        if self.domain.starts_with("http://") || self.domain.starts_with("https://") {
            return format!("{}/{}", self.domain.trim_end_matches('/'), path);
        }

        let scheme = if self.insecure { "http://" } else { "https://" };
        match self.environment {
            Environment::Local => format!("{}{}/{}", scheme, self.domain, path),
            Environment::Production => format!("{}{}.{}/{}", scheme, service, self.domain, path),
        }
    }

    /// Validates the configuration
    pub fn validate(&self) -> Result<()> {
        if self.token.is_empty() {
            return Err(ClientError::invalid_config("token cannot be empty"));
        }

        if self.domain.is_empty() && self.base_url_template.is_none() {
            return Err(ClientError::invalid_config("domain cannot be empty"));
        }

        if self.request_timeout.is_zero() {
            return Err(ClientError::invalid_config(
                "request_timeout must be greater than 0",
            ));
        }

        self.poll.validate()?;

        Ok(())
    }
}

fn parse_bool(s: &str) -> Option<bool> {
    match s.to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
