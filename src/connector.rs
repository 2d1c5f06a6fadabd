//! Order connectors
//!
//! Defines the `OrderSource` trait every shop connector implements, and the
//! Magento 1.x implementation on top of the SOAP v2 API.
//!
//! # Flow
//!
//! ```text
//! connect()      GET  <host>/index.php/api/v2_soap?wsdl   → endpoint, actions
//!                POST login(username, apiKey)             → session id (cached)
//! get_orders()   POST salesOrderList(session, filters)    → summaries
//!                POST salesOrderInfo(session, increment)  → one per summary
//!                map_order(record)                        → Order
//! ```

use crate::auth::{SessionCache, SessionId, SessionState};
use crate::config::{ClientSettings, ConnectorConfig};
use crate::error::{Error, Result};
use crate::http::HttpClient;
use crate::mapping::{map_order, parse_timestamp};
use crate::model::Order;
use crate::soap::{SoapService, SoapValue};
use crate::types::{CredentialsProvider, DateRange};
use async_trait::async_trait;
use futures::stream::{self, StreamExt, TryStreamExt};
use serde_json::Value;
use std::fmt;
use tracing::{debug, info};

/// Path of the SOAP v2 service description, relative to the store URL
pub const WSDL_PATH: &str = "/index.php/api/v2_soap?wsdl";

/// Operations the connector calls
pub const REQUIRED_OPERATIONS: [&str; 3] = [OP_LOGIN, OP_ORDER_LIST, OP_ORDER_INFO];

const OP_LOGIN: &str = "login";
const OP_ORDER_LIST: &str = "salesOrderList";
const OP_ORDER_INFO: &str = "salesOrderInfo";

// ============================================================================
// Connector Trait
// ============================================================================

/// A shop platform that can list orders
#[async_trait]
pub trait OrderSource: Send + Sync {
    /// Platform name
    fn name(&self) -> &str;

    /// Orders created within `range`, in the platform's list order
    async fn get_orders(&self, range: &DateRange) -> Result<Vec<Order>>;
}

// ============================================================================
// Magento Connector
// ============================================================================

/// Magento 1.x connector using the SOAP v2 API
pub struct MagentoConnector {
    host: String,
    credentials: Box<dyn CredentialsProvider>,
    service: SoapService,
    session: SessionCache,
    settings: ClientSettings,
}

impl MagentoConnector {
    /// Connect with default settings.
    ///
    /// Loads the WSDL and logs in before returning.
    pub async fn connect(
        host: impl Into<String>,
        credentials: impl CredentialsProvider + 'static,
    ) -> Result<Self> {
        Self::connect_with_settings(host, credentials, ClientSettings::default()).await
    }

    /// Connect with explicit settings.
    ///
    /// Fails with `Error::Connection` if the WSDL cannot be loaded (no login
    /// is attempted then) and with `Error::Authentication` if the login is
    /// rejected.
    pub async fn connect_with_settings(
        host: impl Into<String>,
        credentials: impl CredentialsProvider + 'static,
        settings: ClientSettings,
    ) -> Result<Self> {
        let host = normalize_host(&host.into())?;
        let http = HttpClient::with_config(settings.http_config())?;

        let service = SoapService::load(http, &wsdl_url(&host))
            .await
            .map_err(Error::into_connection)?;
        service
            .wsdl()
            .require_operations(&REQUIRED_OPERATIONS)
            .map_err(Error::into_connection)?;

        let connector = Self {
            host,
            credentials: Box::new(credentials),
            service,
            session: SessionCache::new(),
            settings,
        };

        connector.session_id().await?;
        info!(host = %connector.host, "Connected to Magento");

        Ok(connector)
    }

    /// Connect using a loaded configuration
    pub async fn from_config(config: &ConnectorConfig) -> Result<Self> {
        config.validate()?;
        Self::connect_with_settings(
            config.host.clone(),
            config.credentials.clone(),
            config.settings(),
        )
        .await
    }

    /// Store base URL, without trailing slash
    pub fn host(&self) -> &str {
        &self.host
    }

    /// Settings in use
    pub fn settings(&self) -> &ClientSettings {
        &self.settings
    }

    /// SOAP endpoint read from the WSDL
    pub fn endpoint(&self) -> &str {
        &self.service.wsdl().endpoint
    }

    /// Session identifier, logging in on first use
    pub async fn session_id(&self) -> Result<SessionId> {
        self.session.get_or_login(|| self.login()).await
    }

    /// Whether a session has been acquired
    pub async fn session_state(&self) -> SessionState {
        self.session.state().await
    }

    /// Number of login calls made by this connector
    pub fn login_count(&self) -> u64 {
        self.session.login_count()
    }

    /// Orders created within `range`, in the order Magento lists them.
    ///
    /// Any failure aborts the whole call.
    pub async fn get_orders(&self, range: &DateRange) -> Result<Vec<Order>> {
        let session = self.session_id().await?;

        let summaries = self.list_orders(&session, range).await?;
        let increment_ids = select_in_range(&summaries, range)?;
        debug!(
            "{} order(s) listed, {} within {}",
            summaries.len(),
            increment_ids.len(),
            range
        );

        if increment_ids.is_empty() {
            return Ok(Vec::new());
        }

        let session = &session;
        stream::iter(increment_ids)
            .map(|increment_id| self.fetch_order(session, increment_id))
            .buffered(self.settings.concurrency.max(1))
            .try_collect()
            .await
    }

    async fn login(&self) -> Result<SessionId> {
        debug!(username = self.credentials.username(), "Logging in");

        let value = self
            .service
            .call(
                OP_LOGIN,
                &[
                    ("username", self.credentials.username().into()),
                    ("apiKey", self.credentials.password().into()),
                ],
            )
            .await
            .map_err(Error::into_login_failure)?;

        match value {
            Value::String(id) if !id.trim().is_empty() => {
                info!(username = self.credentials.username(), "Logged in");
                Ok(SessionId::new(id.trim()))
            }
            _ => Err(Error::authentication("login returned no session identifier")),
        }
    }

    async fn list_orders(&self, session: &SessionId, range: &DateRange) -> Result<Vec<Value>> {
        let value = self
            .service
            .call(
                OP_ORDER_LIST,
                &[
                    ("sessionId", session.as_str().into()),
                    ("filters", created_at_filter(range)),
                ],
            )
            .await
            .map_err(|e| e.into_remote(OP_ORDER_LIST))?;

        match value {
            Value::Array(summaries) => Ok(summaries),
            other => Err(Error::remote(
                OP_ORDER_LIST,
                format!("expected a list of orders, got {}", describe(&other)),
            )),
        }
    }

    async fn fetch_order(&self, session: &SessionId, increment_id: String) -> Result<Order> {
        debug!(%increment_id, "Fetching order");

        let record = self
            .service
            .call(
                OP_ORDER_INFO,
                &[
                    ("sessionId", session.as_str().into()),
                    ("orderIncrementId", increment_id.as_str().into()),
                ],
            )
            .await
            .map_err(|e| e.into_remote(OP_ORDER_INFO))?;

        if !record.is_object() {
            return Err(Error::remote(
                OP_ORDER_INFO,
                format!(
                    "expected an order record for {increment_id}, got {}",
                    describe(&record)
                ),
            ));
        }

        let order = map_order(&record)?;
        debug!(%increment_id, lines = order.lines.len(), "Mapped order");
        Ok(order)
    }
}

#[async_trait]
impl OrderSource for MagentoConnector {
    fn name(&self) -> &str {
        "magento"
    }

    async fn get_orders(&self, range: &DateRange) -> Result<Vec<Order>> {
        MagentoConnector::get_orders(self, range).await
    }
}

impl fmt::Debug for MagentoConnector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MagentoConnector")
            .field("host", &self.host)
            .field("username", &self.credentials.username())
            .field("endpoint", &self.service.wsdl().endpoint)
            .field("session", &self.session)
            .field("settings", &self.settings)
            .finish_non_exhaustive()
    }
}

// ============================================================================
// Helpers
// ============================================================================

/// `filters` argument selecting `created_at` within the range
pub fn created_at_filter(range: &DateRange) -> SoapValue {
    let bound = |key: &str, value: String| {
        SoapValue::structure([
            ("key", SoapValue::text("created_at")),
            (
                "value",
                SoapValue::structure([
                    ("key", SoapValue::text(key)),
                    ("value", SoapValue::text(value)),
                ]),
            ),
        ])
    };

    SoapValue::structure([(
        "complex_filter",
        SoapValue::array([
            bound("from", range.start_param()),
            bound("to", range.end_param()),
        ]),
    )])
}

/// URL of the SOAP v2 WSDL for a store
pub fn wsdl_url(host: &str) -> String {
    format!("{}{WSDL_PATH}", host.trim_end_matches('/'))
}

fn normalize_host(host: &str) -> Result<String> {
    let host = host.trim().trim_end_matches('/');
    let url = url::Url::parse(host)
        .map_err(|e| Error::config(format!("invalid host '{host}': {e}")))?;

    if !matches!(url.scheme(), "http" | "https") {
        return Err(Error::config(format!(
            "host must be an http(s) URL, got '{host}'"
        )));
    }

    Ok(host.to_string())
}

/// Increment ids of the summaries created within the range.
///
/// Summaries without `created_at` are kept; Magento already filtered them.
fn select_in_range(summaries: &[Value], range: &DateRange) -> Result<Vec<String>> {
    let mut increment_ids = Vec::with_capacity(summaries.len());

    for summary in summaries {
        let increment_id = match summary.get("increment_id") {
            Some(Value::String(id)) if !id.is_empty() => id.clone(),
            Some(Value::Number(id)) => id.to_string(),
            _ => {
                return Err(Error::remote(
                    OP_ORDER_LIST,
                    "order summary without increment_id",
                ))
            }
        };

        if let Some(Value::String(created_at)) = summary.get("created_at") {
            let created_at = parse_timestamp("created_at", created_at)?;
            if !range.contains(created_at) {
                debug!(%increment_id, %created_at, "Skipping order outside {}", range);
                continue;
            }
        }

        increment_ids.push(increment_id);
    }

    Ok(increment_ids)
}

fn describe(value: &Value) -> &'static str {
    match value {
        Value::Null => "nothing",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "text",
        Value::Array(_) => "a list",
        Value::Object(_) => "a record",
    }
}
