//! WSDL inspection
//!
//! Reads just enough of the service description to make calls: the
//! endpoint address, the target namespace and each operation's
//! `soapAction`.

use crate::error::{Error, Result};
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use std::collections::BTreeMap;

/// Namespace used when the WSDL does not declare one
pub const DEFAULT_NAMESPACE: &str = "urn:Magento";

/// SOAP action used when the binding does not declare one
pub const DEFAULT_SOAP_ACTION: &str = "urn:Action";

/// What the connector needs from a WSDL document
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WsdlDescriptor {
    /// Service endpoint (`soap:address/@location`)
    pub endpoint: String,
    /// Target namespace of the operations
    pub namespace: String,
    operations: BTreeMap<String, Option<String>>,
}

impl WsdlDescriptor {
    /// Create a descriptor directly, without a document
    pub fn new(endpoint: impl Into<String>, namespace: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            namespace: namespace.into(),
            operations: BTreeMap::new(),
        }
    }

    /// Declare an operation with an optional SOAP action
    #[must_use]
    pub fn with_operation(mut self, name: impl Into<String>, soap_action: Option<String>) -> Self {
        self.operations.insert(name.into(), soap_action);
        self
    }

    /// Parse a WSDL 1.1 document
    pub fn parse(text: &str) -> Result<Self> {
        let mut reader = Reader::from_str(text);
        reader.config_mut().trim_text(true);

        let mut namespace = None;
        let mut endpoint = None;
        let mut operations: BTreeMap<String, Option<String>> = BTreeMap::new();
        // Names of the currently open elements, with their `name` attribute
        let mut open: Vec<(Vec<u8>, Option<String>)> = Vec::new();

        loop {
            let event = reader
                .read_event()
                .map_err(|e| Error::xml(format!("Invalid WSDL: {e}")))?;

            let (start, is_empty) = match event {
                Event::Start(start) => (start, false),
                Event::Empty(start) => (start, true),
                Event::End(_) => {
                    open.pop();
                    continue;
                }
                Event::Eof => break,
                _ => continue,
            };

            let local = start.local_name().as_ref().to_vec();
            let name = attribute(&start, b"name")?;

            match local.as_slice() {
                b"definitions" => {
                    namespace = attribute(&start, b"targetNamespace")?;
                }
                b"address" => {
                    if endpoint.is_none() {
                        endpoint = attribute(&start, b"location")?;
                    }
                }
                b"operation" => {
                    if let Some(op) = &name {
                        operations.entry(op.clone()).or_insert(None);
                    } else if let Some(action) = attribute(&start, b"soapAction")? {
                        // soap:operation inside a binding operation
                        let parent = open
                            .iter()
                            .rev()
                            .find(|(tag, name)| tag == b"operation" && name.is_some())
                            .and_then(|(_, name)| name.clone());
                        if let Some(op) = parent {
                            operations.insert(op, Some(action));
                        }
                    }
                }
                _ => {}
            }

            if !is_empty {
                open.push((local, name));
            }
        }

        let endpoint = endpoint
            .filter(|e| !e.is_empty())
            .ok_or_else(|| Error::decode("WSDL declares no service address"))?;

        Ok(Self {
            endpoint,
            namespace: namespace.unwrap_or_else(|| DEFAULT_NAMESPACE.to_string()),
            operations,
        })
    }

    /// Whether the WSDL declares the operation
    pub fn has_operation(&self, name: &str) -> bool {
        self.operations.contains_key(name)
    }

    /// SOAP action for the operation
    pub fn soap_action(&self, operation: &str) -> &str {
        self.operations
            .get(operation)
            .and_then(|a| a.as_deref())
            .filter(|a| !a.is_empty())
            .unwrap_or(DEFAULT_SOAP_ACTION)
    }

    /// Fail if any of the operations is not declared
    pub fn require_operations(&self, names: &[&str]) -> Result<()> {
        let missing: Vec<&str> = names
            .iter()
            .copied()
            .filter(|name| !self.has_operation(name))
            .collect();

        if missing.is_empty() {
            Ok(())
        } else {
            Err(Error::decode(format!(
                "WSDL does not declare operation(s): {}",
                missing.join(", ")
            )))
        }
    }
}

fn attribute(start: &BytesStart<'_>, local: &[u8]) -> Result<Option<String>> {
    for attr in start.attributes() {
        let attr = attr.map_err(|e| Error::xml(format!("Invalid WSDL attribute: {e}")))?;
        if attr.key.local_name().as_ref() == local {
            let value = attr
                .unescape_value()
                .map_err(|e| Error::xml(format!("Invalid WSDL attribute: {e}")))?;
            return Ok(Some(value.into_owned()));
        }
    }
    Ok(None)
}
