//! HTTP client for the SOAP transport
//!
//! Thin wrapper around reqwest that handles:
//! - A per-request deadline
//! - Default headers and user agent
//! - Error classification (timeout, status, transport)
//!
//! Requests are never retried.

use crate::error::{Error, Result};
use reqwest::{Client, Method, Response};
use std::collections::HashMap;
use std::time::Duration;
use tracing::debug;

/// Content type for SOAP 1.1 requests
pub const SOAP_CONTENT_TYPE: &str = "text/xml; charset=utf-8";

/// Configuration for the HTTP client
#[derive(Debug, Clone)]
pub struct HttpClientConfig {
    /// Request timeout, applied to every call
    pub timeout: Duration,
    /// Default headers for all requests
    pub default_headers: HashMap<String, String>,
    /// User agent string
    pub user_agent: String,
}

impl Default for HttpClientConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(30),
            default_headers: HashMap::new(),
            user_agent: format!("magento-connector/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

impl HttpClientConfig {
    /// Create a new config builder
    pub fn builder() -> HttpClientConfigBuilder {
        HttpClientConfigBuilder::default()
    }
}

/// Builder for HTTP client config
#[derive(Default)]
pub struct HttpClientConfigBuilder {
    config: HttpClientConfig,
}

impl HttpClientConfigBuilder {
    /// Set the request timeout
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.config.timeout = timeout;
        self
    }

    /// Add a default header
    pub fn header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.config.default_headers.insert(key.into(), value.into());
        self
    }

    /// Set user agent
    pub fn user_agent(mut self, agent: impl Into<String>) -> Self {
        self.config.user_agent = agent.into();
        self
    }

    /// Build the config
    pub fn build(self) -> HttpClientConfig {
        self.config
    }
}

/// Status and body of a completed request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    pub body: String,
}

impl HttpResponse {
    /// Whether the status is 2xx
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// HTTP client used for WSDL downloads and SOAP calls
#[derive(Clone)]
pub struct HttpClient {
    client: Client,
    config: HttpClientConfig,
}

impl HttpClient {
    /// Create a new HTTP client with default configuration
    pub fn new() -> Result<Self> {
        Self::with_config(HttpClientConfig::default())
    }

    /// Create a new HTTP client with custom configuration
    pub fn with_config(config: HttpClientConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(config.timeout)
            .user_agent(&config.user_agent)
            .build()
            .map_err(|e| Error::config(format!("Failed to build HTTP client: {e}")))?;

        Ok(Self { client, config })
    }

    /// GET a document and return its body.
    ///
    /// Non-2xx statuses are errors.
    pub async fn get_text(&self, url: &str) -> Result<String> {
        let response = self.send(Method::GET, url, &HashMap::new(), None).await?;
        let status = response.status().as_u16();
        let body = self.read_body(response).await?;

        if !(200..300).contains(&status) {
            return Err(Error::http_status(status, body));
        }

        debug!("GET {} -> {} ({} bytes)", url, status, body.len());
        Ok(body)
    }

    /// POST an XML document with a `SOAPAction` header.
    ///
    /// The status is returned instead of checked: SOAP servers report faults
    /// with HTTP 500 and a regular envelope body.
    pub async fn post_xml(&self, url: &str, soap_action: &str, body: String) -> Result<HttpResponse> {
        let mut headers = HashMap::new();
        headers.insert("Content-Type".to_string(), SOAP_CONTENT_TYPE.to_string());
        headers.insert("SOAPAction".to_string(), format!("\"{soap_action}\""));

        let response = self.send(Method::POST, url, &headers, Some(body)).await?;
        let status = response.status().as_u16();
        let body = self.read_body(response).await?;

        debug!("POST {} [{}] -> {} ({} bytes)", url, soap_action, status, body.len());
        Ok(HttpResponse { status, body })
    }

    async fn send(
        &self,
        method: Method,
        url: &str,
        headers: &HashMap<String, String>,
        body: Option<String>,
    ) -> Result<Response> {
        let mut req = self.client.request(method, url);

        for (key, value) in &self.config.default_headers {
            req = req.header(key.as_str(), value.as_str());
        }

        for (key, value) in headers {
            req = req.header(key.as_str(), value.as_str());
        }

        if let Some(body) = body {
            req = req.body(body);
        }

        req.timeout(self.config.timeout)
            .send()
            .await
            .map_err(|e| self.classify(e))
    }

    async fn read_body(&self, response: Response) -> Result<String> {
        response.text().await.map_err(|e| self.classify(e))
    }

    fn classify(&self, e: reqwest::Error) -> Error {
        if e.is_timeout() {
            return Error::Timeout {
                timeout_ms: self.config.timeout.as_millis() as u64,
            };
        }
        Error::Http(e)
    }
}

impl std::fmt::Debug for HttpClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpClient")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}
