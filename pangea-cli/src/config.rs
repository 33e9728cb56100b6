//! Configuration module
//!
//! Turns CLI flags into a service configuration and a ready client.

use anyhow::{Context, Result};
use pangea_client::{Environment, HttpTransport, JobClient, ServiceConfig};

/// CLI configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Service all commands talk to
    pub service: String,
    /// Settings shared by every request
    pub service_config: ServiceConfig,
}

impl Config {
    pub fn new(service: String, token: String, domain: String, insecure: bool, local: bool) -> Self {
        let environment = if local {
            Environment::Local
        } else {
            Environment::Production
        };

        let service_config = ServiceConfig::new(token)
            .with_domain(domain)
            .with_insecure(insecure)
            .with_environment(environment)
            .with_custom_user_agent(concat!("pangea-cli/", env!("CARGO_PKG_VERSION")));

        Self {
            service,
            service_config,
        }
    }

    /// Build a job client for the configured service
    pub fn client(&self) -> Result<JobClient<HttpTransport>> {
        JobClient::http(self.service.clone(), self.service_config.clone())
            .context("Failed to create client")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_local_insecure() {
        let config = Config::new(
            "redact".to_string(),
            "token".to_string(),
            "localhost:8000".to_string(),
            true,
            true,
        );
        let client = config.client().unwrap();
        assert_eq!(client.transport().url("v1/redact"), "http://localhost:8000/v1/redact");
    }

    #[test]
    fn test_production() {
        let config = Config::new(
            "redact".to_string(),
            "token".to_string(),
            "domain.test".to_string(),
            false,
            false,
        );
        let client = config.client().unwrap();
        assert_eq!(
            client.transport().url("v1/redact"),
            "https://redact.domain.test/v1/redact"
        );
    }
}
