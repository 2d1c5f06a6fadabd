//! SOAP module
//!
//! The subset of SOAP 1.1 the Magento v2 API needs.
//!
//! # Overview
//!
//! - `WsdlDescriptor` - endpoint, namespace and actions read from the WSDL
//! - `encode_request` - RPC request envelopes built from `SoapValue`s
//! - `decode_response` - response envelopes decoded into `serde_json::Value`
//! - `SoapService` - the above bound to an `HttpClient`

mod decoder;
mod envelope;
mod service;
mod wsdl;

pub use decoder::{decode_response, xml_to_value};
pub use envelope::{encode_request, SoapValue, SOAP_ENC_NS, SOAP_ENV_NS};
pub use service::SoapService;
pub use wsdl::{WsdlDescriptor, DEFAULT_NAMESPACE, DEFAULT_SOAP_ACTION};

#[cfg(test)]
mod tests;
