//! HTTP client module
//!
//! Transport for the SOAP layer: downloads the WSDL and posts envelopes.
//! Every request carries the configured deadline; nothing is retried.

mod client;

pub use client::{HttpClient, HttpClientConfig, HttpClientConfigBuilder, HttpResponse, SOAP_CONTENT_TYPE};
