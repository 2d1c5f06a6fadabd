//! SOAP 1.1 request envelopes
//!
//! Only the RPC shapes Magento's v2 API needs: string parameters, structs
//! and arrays of structs (arrays are written as repeated `<item>` elements).

use quick_xml::escape::escape;

/// SOAP 1.1 envelope namespace
pub const SOAP_ENV_NS: &str = "http://schemas.xmlsoap.org/soap/envelope/";

/// SOAP 1.1 encoding namespace
pub const SOAP_ENC_NS: &str = "http://schemas.xmlsoap.org/soap/encoding/";

/// A request parameter value
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SoapValue {
    /// Leaf text, escaped on output
    Text(String),
    /// Named fields, written in order
    Struct(Vec<(String, SoapValue)>),
    /// Members written as `<item>` elements
    Array(Vec<SoapValue>),
}

impl SoapValue {
    /// Leaf text value
    pub fn text(value: impl Into<String>) -> Self {
        Self::Text(value.into())
    }

    /// Struct from `(name, value)` pairs
    pub fn structure<I, K>(fields: I) -> Self
    where
        I: IntoIterator<Item = (K, SoapValue)>,
        K: Into<String>,
    {
        Self::Struct(fields.into_iter().map(|(k, v)| (k.into(), v)).collect())
    }

    /// Array of members
    pub fn array(items: impl IntoIterator<Item = SoapValue>) -> Self {
        Self::Array(items.into_iter().collect())
    }

    fn write(&self, name: &str, out: &mut String) {
        out.push('<');
        out.push_str(name);
        out.push('>');
        match self {
            Self::Text(text) => out.push_str(&escape(text.as_str())),
            Self::Struct(fields) => {
                for (field, value) in fields {
                    value.write(field, out);
                }
            }
            Self::Array(items) => {
                for item in items {
                    item.write("item", out);
                }
            }
        }
        out.push_str("</");
        out.push_str(name);
        out.push('>');
    }
}

impl From<&str> for SoapValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for SoapValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

/// Build the envelope for one RPC call.
///
/// The operation element lives in the `ns1` prefix bound to `namespace`;
/// parameters are unqualified, as Magento's RPC/encoded binding expects.
pub fn encode_request(namespace: &str, operation: &str, params: &[(&str, SoapValue)]) -> String {
    let mut out = String::with_capacity(512);
    out.push_str(r#"<?xml version="1.0" encoding="UTF-8"?>"#);
    out.push_str(&format!(
        r#"<SOAP-ENV:Envelope xmlns:SOAP-ENV="{SOAP_ENV_NS}" xmlns:SOAP-ENC="{SOAP_ENC_NS}" xmlns:ns1="{}" SOAP-ENV:encodingStyle="{SOAP_ENC_NS}">"#,
        escape(namespace)
    ));
    out.push_str("<SOAP-ENV:Body>");
    out.push_str(&format!("<ns1:{operation}>"));
    for (name, value) in params {
        value.write(name, &mut out);
    }
    out.push_str(&format!("</ns1:{operation}>"));
    out.push_str("</SOAP-ENV:Body></SOAP-ENV:Envelope>");
    out
}
