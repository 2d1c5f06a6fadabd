//! SOAP service calls
//!
//! Binds the HTTP transport to a loaded WSDL and performs RPC calls.

use super::decoder::decode_response;
use super::envelope::{encode_request, SoapValue};
use super::wsdl::WsdlDescriptor;
use crate::error::{Error, Result};
use crate::http::HttpClient;
use serde_json::Value;
use tracing::{debug, info};

/// Longest response excerpt kept in HTTP status errors
const ERROR_BODY_LIMIT: usize = 512;

/// A SOAP service described by a WSDL
#[derive(Debug, Clone)]
pub struct SoapService {
    http: HttpClient,
    wsdl: WsdlDescriptor,
}

impl SoapService {
    /// Create a service from an already known description
    pub fn new(http: HttpClient, wsdl: WsdlDescriptor) -> Self {
        Self { http, wsdl }
    }

    /// Download and parse the WSDL at `wsdl_url`
    pub async fn load(http: HttpClient, wsdl_url: &str) -> Result<Self> {
        let text = http.get_text(wsdl_url).await?;
        if text.trim().is_empty() {
            return Err(Error::decode("Empty WSDL document"));
        }

        let wsdl = WsdlDescriptor::parse(&text)?;
        info!(
            endpoint = %wsdl.endpoint,
            namespace = %wsdl.namespace,
            "Loaded WSDL from {}",
            wsdl_url
        );

        Ok(Self { http, wsdl })
    }

    /// The service description
    pub fn wsdl(&self) -> &WsdlDescriptor {
        &self.wsdl
    }

    /// Call an operation and return its decoded return part.
    ///
    /// SOAP faults are reported as `Error::SoapFault` whatever the HTTP
    /// status; other non-2xx responses as `Error::HttpStatus`.
    pub async fn call(&self, operation: &str, params: &[(&str, SoapValue)]) -> Result<Value> {
        let envelope = encode_request(&self.wsdl.namespace, operation, params);
        debug!("Calling {} at {}", operation, self.wsdl.endpoint);

        let response = self
            .http
            .post_xml(&self.wsdl.endpoint, self.wsdl.soap_action(operation), envelope)
            .await?;

        match decode_response(&response.body) {
            Ok(value) if response.is_success() => Ok(value),
            Err(fault @ Error::SoapFault { .. }) => Err(fault),
            Err(e) if response.is_success() => Err(e),
            _ => Err(Error::http_status(
                response.status,
                excerpt(&response.body),
            )),
        }
    }
}

fn excerpt(body: &str) -> String {
    match body.char_indices().nth(ERROR_BODY_LIMIT) {
        Some((idx, _)) => format!("{}...", &body[..idx]),
        None => body.to_string(),
    }
}
