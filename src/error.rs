//! Error types for the Magento connector
//!
//! All public APIs return `Result<T, Error>` where Error is defined here.
//! Transport-level variants (HTTP, XML, SOAP faults) are raised by the
//! `http` and `soap` layers; the connector converts them into the
//! connection / authentication / remote-service variants depending on the
//! phase in which they happened.

use thiserror::Error;

/// The main error type for the connector
#[derive(Error, Debug)]
pub enum Error {
    // ============================================================================
    // Caller / Configuration Errors
    // ============================================================================
    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("Invalid date range: {message}")]
    InvalidDateRange { message: String },

    #[error("Undefined variable in template: {variable}")]
    UndefinedVariable { variable: String },

    #[error("Failed to parse YAML: {0}")]
    YamlParse(#[from] serde_yaml::Error),

    // ============================================================================
    // Connector Errors
    // ============================================================================
    #[error("Connection failed: {message}")]
    Connection { message: String },

    #[error("Authentication failed: {message}")]
    Authentication { message: String },

    #[error("Remote call '{operation}' failed: {message}")]
    RemoteService { operation: String, message: String },

    #[error("Failed to map field '{field}': {message}")]
    Mapping { field: String, message: String },

    // ============================================================================
    // Transport Errors
    // ============================================================================
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("HTTP {status}: {body}")]
    HttpStatus { status: u16, body: String },

    #[error("Request timeout after {timeout_ms}ms")]
    Timeout { timeout_ms: u64 },

    #[error("SOAP fault {code}: {message}")]
    SoapFault { code: String, message: String },

    #[error("XML parsing error: {message}")]
    XmlParse { message: String },

    #[error("Failed to decode response: {message}")]
    Decode { message: String },

    // ============================================================================
    // I/O Errors
    // ============================================================================
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Create a config error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Create an invalid date range error
    pub fn invalid_range(message: impl Into<String>) -> Self {
        Self::InvalidDateRange {
            message: message.into(),
        }
    }

    /// Create an undefined variable error
    pub fn undefined_var(variable: impl Into<String>) -> Self {
        Self::UndefinedVariable {
            variable: variable.into(),
        }
    }

    /// Create a connection error
    pub fn connection(message: impl Into<String>) -> Self {
        Self::Connection {
            message: message.into(),
        }
    }

    /// Create an authentication error
    pub fn authentication(message: impl Into<String>) -> Self {
        Self::Authentication {
            message: message.into(),
        }
    }

    /// Create a remote service error for the given SOAP operation
    pub fn remote(operation: impl Into<String>, message: impl Into<String>) -> Self {
        Self::RemoteService {
            operation: operation.into(),
            message: message.into(),
        }
    }

    /// Create a mapping error for a record field
    pub fn mapping(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Mapping {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Create an HTTP status error
    pub fn http_status(status: u16, body: impl Into<String>) -> Self {
        Self::HttpStatus {
            status,
            body: body.into(),
        }
    }

    /// Create a SOAP fault error
    pub fn soap_fault(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self::SoapFault {
            code: code.into(),
            message: message.into(),
        }
    }

    /// Create an XML parse error
    pub fn xml(message: impl Into<String>) -> Self {
        Self::XmlParse {
            message: message.into(),
        }
    }

    /// Create a decode error
    pub fn decode(message: impl Into<String>) -> Self {
        Self::Decode {
            message: message.into(),
        }
    }

    /// Re-classify a transport error raised while loading the service description.
    ///
    /// Errors that already belong to the connector taxonomy pass through.
    pub fn into_connection(self) -> Self {
        if self.is_classified() {
            return self;
        }
        Self::connection(self.to_string())
    }

    /// Re-classify a transport error raised by a data call.
    ///
    /// Errors that already belong to the connector taxonomy pass through.
    pub fn into_remote(self, operation: &str) -> Self {
        if self.is_classified() {
            return self;
        }
        Self::remote(operation, self.to_string())
    }

    /// Re-classify an error raised by the login call.
    ///
    /// A SOAP fault means the credentials were rejected; anything else means
    /// the endpoint could not be used at all.
    pub fn into_login_failure(self) -> Self {
        match self {
            Self::SoapFault { code, message } => {
                Self::authentication(format!("login rejected ({code}): {message}"))
            }
            other if other.is_classified() => other,
            other => Self::connection(format!("login call failed: {other}")),
        }
    }

    /// Whether this is a connection error
    pub fn is_connection(&self) -> bool {
        matches!(self, Error::Connection { .. })
    }

    /// Whether this is an authentication error
    pub fn is_authentication(&self) -> bool {
        matches!(self, Error::Authentication { .. })
    }

    /// Whether this is a remote service error
    pub fn is_remote_service(&self) -> bool {
        matches!(self, Error::RemoteService { .. })
    }

    /// Whether this is a mapping error
    pub fn is_mapping(&self) -> bool {
        matches!(self, Error::Mapping { .. })
    }

    fn is_classified(&self) -> bool {
        matches!(
            self,
            Error::Connection { .. }
                | Error::Authentication { .. }
                | Error::RemoteService { .. }
                | Error::Mapping { .. }
                | Error::InvalidDateRange { .. }
                | Error::Config { .. }
        )
    }
}

/// Result type alias for the connector
pub type Result<T> = std::result::Result<T, Error>;
