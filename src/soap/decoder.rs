//! SOAP response decoding
//!
//! Converts XML into `serde_json::Value` so the mapping layer can work on
//! plain records:
//! - namespace prefixes are dropped (`ns1:loginResponse` → `loginResponse`)
//! - elements carrying `SOAP-ENC:arrayType`, typed `xsi:type="...Array"`,
//!   or whose children are all `<item>`, become arrays
//! - repeated sibling elements become arrays
//! - `xsi:nil="true"` becomes `null`
//! - leaf text stays a string, untrimmed; numbers are never coerced
//! - whitespace between child elements is dropped

use crate::error::{Error, Result};
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use serde_json::{Map, Value};

/// An element being built while its children are read
struct Frame {
    name: String,
    children: Vec<(String, Value)>,
    text: String,
    is_array: bool,
    is_nil: bool,
}

impl Frame {
    fn open(start: &BytesStart<'_>) -> Result<Self> {
        let mut frame = Self {
            name: String::from_utf8_lossy(start.local_name().as_ref()).into_owned(),
            children: Vec::new(),
            text: String::new(),
            is_array: false,
            is_nil: false,
        };

        for attr in start.attributes() {
            let attr = attr.map_err(|e| Error::xml(format!("Malformed attribute: {e}")))?;
            match attr.key.local_name().as_ref() {
                b"arrayType" => frame.is_array = true,
                b"type" => {
                    let value = attr
                        .unescape_value()
                        .map_err(|e| Error::xml(format!("Malformed attribute: {e}")))?;
                    if value.ends_with("Array") {
                        frame.is_array = true;
                    }
                }
                b"nil" => {
                    let value = attr
                        .unescape_value()
                        .map_err(|e| Error::xml(format!("Malformed attribute: {e}")))?;
                    frame.is_nil = value == "true" || value == "1";
                }
                _ => {}
            }
        }

        Ok(frame)
    }

    fn close(self) -> (String, Value) {
        if self.is_nil {
            return (self.name, Value::Null);
        }

        let all_items =
            !self.children.is_empty() && self.children.iter().all(|(name, _)| name == "item");

        let value = if self.is_array || all_items {
            Value::Array(self.children.into_iter().map(|(_, v)| v).collect())
        } else if !self.children.is_empty() {
            let mut obj = Map::new();
            for (name, child) in self.children {
                // Handle repeated elements with the same name
                match obj.get_mut(&name) {
                    Some(Value::Array(arr)) => arr.push(child),
                    Some(existing) => {
                        let first = existing.take();
                        *existing = Value::Array(vec![first, child]);
                    }
                    None => {
                        obj.insert(name, child);
                    }
                }
            }
            Value::Object(obj)
        } else {
            Value::String(self.text)
        };

        (self.name, value)
    }
}

/// Parse an XML document into `{ "<root local name>": <value> }`
pub fn xml_to_value(xml: &str) -> Result<Value> {
    let mut reader = Reader::from_str(xml);

    let mut stack: Vec<Frame> = Vec::new();
    let mut root: Option<(String, Value)> = None;

    loop {
        let event = reader
            .read_event()
            .map_err(|e| Error::xml(e.to_string()))?;

        match event {
            Event::Start(start) => stack.push(Frame::open(&start)?),
            Event::Empty(start) => {
                let closed = Frame::open(&start)?.close();
                attach(&mut stack, &mut root, closed);
            }
            Event::End(_) => {
                let frame = stack
                    .pop()
                    .ok_or_else(|| Error::xml("Unexpected closing tag"))?;
                attach(&mut stack, &mut root, frame.close());
            }
            Event::Text(text) => {
                if let Some(frame) = stack.last_mut() {
                    let text = text.unescape().map_err(|e| Error::xml(e.to_string()))?;
                    frame.text.push_str(&text);
                }
            }
            Event::CData(data) => {
                if let Some(frame) = stack.last_mut() {
                    frame.text.push_str(&String::from_utf8_lossy(&data.into_inner()));
                }
            }
            Event::Eof => break,
            _ => {}
        }
    }

    if let Some(frame) = stack.last() {
        return Err(Error::xml(format!("Missing closing tag for {}", frame.name)));
    }

    let (name, value) = root.ok_or_else(|| Error::xml("Document has no root element"))?;
    let mut doc = Map::new();
    doc.insert(name, value);
    Ok(Value::Object(doc))
}

fn attach(stack: &mut [Frame], root: &mut Option<(String, Value)>, element: (String, Value)) {
    match stack.last_mut() {
        Some(parent) => parent.children.push(element),
        None => *root = Some(element),
    }
}

/// Decode a SOAP response envelope and return the operation's return part.
///
/// A `Fault` in the body becomes `Error::SoapFault`.
pub fn decode_response(body: &str) -> Result<Value> {
    if body.trim().is_empty() {
        return Err(Error::decode("Empty response body"));
    }

    let doc = xml_to_value(body)?;
    let envelope = doc
        .get("Envelope")
        .ok_or_else(|| Error::decode("Missing SOAP Envelope"))?;
    let soap_body = envelope
        .get("Body")
        .ok_or_else(|| Error::decode("Missing SOAP Body"))?;

    if let Some(fault) = soap_body.get("Fault") {
        return Err(fault_error(fault));
    }

    let response = match soap_body {
        Value::Object(map) => map
            .values()
            .next()
            .ok_or_else(|| Error::decode("Empty SOAP Body"))?,
        _ => return Err(Error::decode("Empty SOAP Body")),
    };

    // The response element wraps exactly one return part
    match response {
        Value::Object(parts) if parts.len() == 1 => {
            Ok(parts.values().next().cloned().unwrap_or(Value::Null))
        }
        Value::String(s) if s.trim().is_empty() => Ok(Value::Null),
        other => Ok(other.clone()),
    }
}

fn fault_error(fault: &Value) -> Error {
    let field = |name: &str| match fault.get(name) {
        Some(Value::String(s)) => s.clone(),
        Some(Value::Null) | None => String::new(),
        Some(other) => other.to_string(),
    };

    let code = field("faultcode");
    let message = field("faultstring");
    Error::soap_fault(
        if code.is_empty() { "unknown".to_string() } else { code },
        message,
    )
}
