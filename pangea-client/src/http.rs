//! HTTP transport
//!
//! reqwest-backed [`Transport`]. Submits `POST {service}/{endpoint}` and polls
//! `GET {service}/request/{request_id}`. Responses are handed back as raw
//! bytes; nothing here decides whether a response is a success.

use async_trait::async_trait;
use pangea_core::{RawResponse, RequestId};
use reqwest::Client;
use reqwest::header::{AUTHORIZATION, HeaderMap, HeaderValue, USER_AGENT};
use tracing::debug;

use crate::config::ServiceConfig;
use crate::error::{ClientError, Result};
use crate::transport::{JobRequest, Transport, TransportError};

/// User-Agent prefix sent with every request
pub const USER_AGENT_PREFIX: &str = concat!("pangea-rust/", env!("CARGO_PKG_VERSION"));

/// HTTP implementation of [`Transport`] for a single service
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: Client,
    service: String,
    config: ServiceConfig,
    authorization: HeaderValue,
    user_agent: HeaderValue,
    extra_headers: HeaderMap,
}

impl HttpTransport {
    /// Creates a new HTTP transport
    ///
    /// # Arguments
    /// * `service` - Service name, used as the subdomain (e.g. "audit")
    /// * `config` - Service configuration
    pub fn new(service: impl Into<String>, config: ServiceConfig) -> Result<Self> {
        let client = Client::builder().timeout(config.request_timeout).build()?;
        Self::with_client(service, config, client)
    }

    /// Creates a new HTTP transport with a custom reqwest client
    ///
    /// The client's own timeout settings take precedence over
    /// `config.request_timeout`.
    pub fn with_client(
        service: impl Into<String>,
        config: ServiceConfig,
        client: Client,
    ) -> Result<Self> {
        let service = service.into();
        if service.is_empty() {
            return Err(ClientError::invalid_config("service name cannot be empty"));
        }
        config.validate()?;

        let mut authorization = HeaderValue::from_str(&format!("Bearer {}", config.token))
            .map_err(|_| ClientError::invalid_config("token contains invalid header characters"))?;
        authorization.set_sensitive(true);

        let user_agent = match &config.custom_user_agent {
            Some(custom) if !custom.is_empty() => format!("{} {}", USER_AGENT_PREFIX, custom),
            _ => USER_AGENT_PREFIX.to_string(),
        };
        let user_agent = HeaderValue::from_str(&user_agent).map_err(|_| {
            ClientError::invalid_config("custom user agent contains invalid header characters")
        })?;

        Ok(Self {
            client,
            service,
            config,
            authorization,
            user_agent,
            extra_headers: HeaderMap::new(),
        })
    }

    /// Adds headers sent with every request
    ///
    /// Authorization and User-Agent are always set by the transport and
    /// cannot be overridden here.
    pub fn with_extra_headers(mut self, headers: HeaderMap) -> Self {
        self.extra_headers = headers;
        self
    }

    pub fn service(&self) -> &str {
        &self.service
    }

    pub fn config(&self) -> &ServiceConfig {
        &self.config
    }

    /// Full URL for a path on this service
    pub fn url(&self, path: &str) -> String {
        self.config.url(&self.service, path)
    }

    fn headers(&self) -> HeaderMap {
        let mut headers = self.extra_headers.clone();
        headers.insert(AUTHORIZATION, self.authorization.clone());
        headers.insert(USER_AGENT, self.user_agent.clone());
        headers
    }

    /// Adds the configured `config_id` to object payloads lacking one
    fn payload(&self, request: &JobRequest) -> serde_json::Value {
        let mut payload = request.payload.clone();
        if let (Some(config_id), Some(object)) = (&self.config.config_id, payload.as_object_mut()) {
            object
                .entry("config_id")
                .or_insert_with(|| serde_json::Value::String(config_id.clone()));
        }
        payload
    }

    async fn read(response: reqwest::Response) -> std::result::Result<RawResponse, TransportError> {
        let status_code = response.status().as_u16();
        let body = response.bytes().await?;
        Ok(RawResponse::new(status_code, body.to_vec()))
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn submit(&self, request: &JobRequest) -> std::result::Result<RawResponse, TransportError> {
        let url = self.url(&request.endpoint);
        debug!("POST {}", url);

        let response = self
            .client
            .post(&url)
            .headers(self.headers())
            .json(&self.payload(request))
            .send()
            .await?;

        Self::read(response).await
    }

    async fn poll_status(
        &self,
        request_id: &RequestId,
    ) -> std::result::Result<RawResponse, TransportError> {
        let url = self.url(&format!("request/{}", request_id));
        debug!("GET {}", url);

        let response = self
            .client
            .get(&url)
            .headers(self.headers())
            .send()
            .await?;

        Self::read(response).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn transport(config: ServiceConfig) -> HttpTransport {
        HttpTransport::new("embargo", config).unwrap()
    }

    #[test]
    fn test_transport_creation() {
        let transport = transport(ServiceConfig::new("token").with_domain("domain.test"));
        assert_eq!(transport.service(), "embargo");
        assert_eq!(
            transport.url("v1/ip/check"),
            "https://embargo.domain.test/v1/ip/check"
        );
    }

    #[test]
    fn test_rejects_empty_service_and_token() {
        assert!(HttpTransport::new("", ServiceConfig::new("token")).is_err());
        assert!(HttpTransport::new("embargo", ServiceConfig::new("")).is_err());
    }

    #[test]
    fn test_user_agent() {
        let plain = transport(ServiceConfig::new("token"));
        assert_eq!(plain.user_agent.to_str().unwrap(), USER_AGENT_PREFIX);

        let custom = transport(ServiceConfig::new("token").with_custom_user_agent("my-app/1.0"));
        assert_eq!(
            custom.user_agent.to_str().unwrap(),
            format!("{} my-app/1.0", USER_AGENT_PREFIX)
        );
    }

    #[test]
    fn test_extra_headers_cannot_override_auth() {
        let mut extra = HeaderMap::new();
        extra.insert(AUTHORIZATION, HeaderValue::from_static("Bearer other"));
        extra.insert("x-trace", HeaderValue::from_static("abc"));

        let transport = transport(ServiceConfig::new("token")).with_extra_headers(extra);
        let headers = transport.headers();
        assert_eq!(headers.get(AUTHORIZATION).unwrap(), "Bearer token");
        assert_eq!(headers.get("x-trace").unwrap(), "abc");
    }

    #[test]
    fn test_config_id_injection() {
        let transport = transport(ServiceConfig::new("token").with_config_id("pci_default"));

        let injected = transport.payload(&JobRequest::new("v1/x", json!({"ip": "1.1.1.1"})));
        assert_eq!(injected["config_id"], "pci_default");

        let kept = transport.payload(&JobRequest::new(
            "v1/x",
            json!({"ip": "1.1.1.1", "config_id": "pci_explicit"}),
        ));
        assert_eq!(kept["config_id"], "pci_explicit");

        let untouched = transport.payload(&JobRequest::new("v1/x", json!(["not", "an", "object"])));
        assert_eq!(untouched, json!(["not", "an", "object"]));
    }
}
