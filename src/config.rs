//! Connector configuration
//!
//! YAML configuration for a Magento connector. String values may carry
//! `{{ env.NAME }}` placeholders, resolved after parsing so substituted
//! secrets are never read as YAML. Placeholders must be quoted:
//!
//! ```yaml
//! host: https://shop.example.com
//! credentials:
//!   username: api-user
//!   password: "{{ env.MAGENTO_API_KEY }}"
//! http:
//!   timeout_secs: 30
//! concurrency: 4
//! ```

use crate::error::{Error, Result};
use crate::http::HttpClientConfig;
use crate::template;
use crate::types::Credentials;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use std::time::Duration;

const DEFAULT_TIMEOUT_SECS: u64 = 30;
const DEFAULT_CONCURRENCY: usize = 4;

// ============================================================================
// Client Settings
// ============================================================================

/// Runtime settings of a connector
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientSettings {
    /// Deadline for every remote call
    pub timeout: Duration,
    /// User agent override
    pub user_agent: Option<String>,
    /// Maximum number of order details fetched at once
    pub concurrency: usize,
}

impl Default for ClientSettings {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            user_agent: None,
            concurrency: DEFAULT_CONCURRENCY,
        }
    }
}

impl ClientSettings {
    /// Set the per-call deadline
    #[must_use]
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set the detail fetch concurrency (at least 1)
    #[must_use]
    pub fn concurrency(mut self, concurrency: usize) -> Self {
        self.concurrency = concurrency.max(1);
        self
    }

    /// Set the user agent
    #[must_use]
    pub fn user_agent(mut self, agent: impl Into<String>) -> Self {
        self.user_agent = Some(agent.into());
        self
    }

    /// HTTP transport configuration for these settings
    pub fn http_config(&self) -> HttpClientConfig {
        let builder = HttpClientConfig::builder().timeout(self.timeout);
        match &self.user_agent {
            Some(agent) => builder.user_agent(agent.clone()).build(),
            None => builder.build(),
        }
    }
}

// ============================================================================
// YAML Config
// ============================================================================

/// Connector configuration loaded from YAML
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConnectorConfig {
    /// Store base URL, e.g. `https://shop.example.com`
    pub host: String,

    /// API user credentials
    pub credentials: Credentials,

    /// HTTP settings
    #[serde(default)]
    pub http: HttpSettings,

    /// Maximum number of order details fetched at once
    #[serde(default = "default_concurrency")]
    pub concurrency: usize,
}

/// HTTP section of the configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HttpSettings {
    /// Deadline for every remote call, in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// User agent override
    #[serde(default)]
    pub user_agent: Option<String>,
}

impl Default for HttpSettings {
    fn default() -> Self {
        Self {
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            user_agent: None,
        }
    }
}

fn default_timeout_secs() -> u64 {
    DEFAULT_TIMEOUT_SECS
}

fn default_concurrency() -> usize {
    DEFAULT_CONCURRENCY
}

impl ConnectorConfig {
    /// Runtime settings derived from this configuration
    pub fn settings(&self) -> ClientSettings {
        ClientSettings {
            timeout: Duration::from_secs(self.http.timeout_secs),
            user_agent: self.http.user_agent.clone(),
            concurrency: self.concurrency,
        }
    }

    /// Resolve `{{ env.NAME }}` placeholders in the string values
    fn render_templates<F>(&mut self, lookup: &F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        self.host = template::render_with(&self.host, lookup)?;
        self.credentials.username = template::render_with(&self.credentials.username, lookup)?;
        self.credentials.password = template::render_with(&self.credentials.password, lookup)?;
        if let Some(agent) = &self.http.user_agent {
            self.http.user_agent = Some(template::render_with(agent, lookup)?);
        }
        Ok(())
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        let host = self.host.trim();
        if host.is_empty() {
            return Err(Error::config("host cannot be empty"));
        }

        let url = url::Url::parse(host)
            .map_err(|e| Error::config(format!("invalid host '{host}': {e}")))?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(Error::config(format!(
                "host must be an http(s) URL, got scheme '{}'",
                url.scheme()
            )));
        }

        if self.credentials.username.trim().is_empty() {
            return Err(Error::config("credentials.username cannot be empty"));
        }

        if self.concurrency == 0 {
            return Err(Error::config("concurrency must be at least 1"));
        }

        if self.http.timeout_secs == 0 {
            return Err(Error::config("http.timeout_secs must be at least 1"));
        }

        Ok(())
    }
}

/// Load a configuration file
pub fn load_config(path: impl AsRef<Path>) -> Result<ConnectorConfig> {
    let path = path.as_ref();
    let content = fs::read_to_string(path).map_err(|e| {
        Error::config(format!(
            "Failed to read config file '{}': {}",
            path.display(),
            e
        ))
    })?;
    load_config_from_str(&content)
}

/// Load a configuration from a YAML string, resolving placeholders from the
/// process environment
pub fn load_config_from_str(yaml: &str) -> Result<ConnectorConfig> {
    parse_config(yaml, |name| std::env::var(name).ok())
}

fn parse_config<F>(yaml: &str, lookup: F) -> Result<ConnectorConfig>
where
    F: Fn(&str) -> Option<String>,
{
    let mut config: ConnectorConfig = serde_yaml::from_str(yaml)?;
    config.render_templates(&lookup)?;
    config.validate()?;
    Ok(config)
}
