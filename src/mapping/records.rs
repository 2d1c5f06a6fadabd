//! Magento record mappers
//!
//! Pure functions from decoded `salesOrderEntity` records to the order
//! model. Every required field must be present; nothing is defaulted except
//! an item's weight, which Magento leaves empty for virtual products.

use crate::error::{Error, Result};
use crate::model::{Address, AddressRole, Customer, Item, Order, OrderLine};
use chrono::{DateTime, NaiveDateTime, Utc};
use serde_json::Value;

/// Timestamp format of Magento's `created_at` / `updated_at` (UTC)
pub const MAGENTO_TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Map the customer fields of an order record
pub fn map_customer(record: &Value) -> Result<Customer> {
    Ok(Customer {
        first_name: required_text(record, "customer_firstname")?,
        last_name: required_text(record, "customer_lastname")?,
        email: required_text(record, "customer_email")?,
    })
}

/// Map a `billing_address` / `shipping_address` record
pub fn map_address(record: &Value, role: AddressRole) -> Result<Address> {
    let street = street_lines(record)?;
    let postal_code = required_text(record, "postcode")?;
    let city = required_text(record, "city")?;
    let country_code = country_code(&required_text(record, "country_id")?)?;

    let mut address = Address::new(role, street, postal_code, city, country_code);
    if let Some(phone) = optional_text(record, "telephone")? {
        address.add_phone(phone);
    }

    Ok(address)
}

/// Map the `items` records of an order, keeping their order
pub fn map_order_lines(records: &[Value]) -> Result<Vec<OrderLine>> {
    records
        .iter()
        .enumerate()
        .map(|(idx, record)| map_order_line(record).map_err(|e| nested(e, &format!("items[{idx}]"))))
        .collect()
}

fn map_order_line(record: &Value) -> Result<OrderLine> {
    let price = required_text(record, "price")?;
    let weight = match optional_text(record, "weight")? {
        Some(text) => parse_decimal("weight", &text)?,
        None => 0.0,
    };
    let quantity = required_text(record, "qty_ordered")?;

    let item = Item {
        name: required_text(record, "name")?,
        sku: required_text(record, "sku")?,
        price_with_tax: parse_decimal("price", &price)?,
        weight,
    };

    Ok(OrderLine::new(item, parse_decimal("qty_ordered", &quantity)?))
}

/// Map a full `salesOrderInfo` record
pub fn map_order(record: &Value) -> Result<Order> {
    if !record.is_object() {
        return Err(Error::mapping("order", "expected an order record"));
    }

    let increment_id = required_text(record, "increment_id")?;
    let created_at = parse_timestamp("created_at", &required_text(record, "created_at")?)?;
    let updated_at = parse_timestamp("updated_at", &required_text(record, "updated_at")?)?;

    let billing = required_object(record, "billing_address")?;
    let shipping = required_object(record, "shipping_address")?;
    let items = match record.get("items") {
        Some(Value::Array(items)) => items.as_slice(),
        Some(Value::Null) | None => return Err(Error::mapping("items", "missing")),
        Some(_) => return Err(Error::mapping("items", "expected a list of items")),
    };

    Ok(Order {
        increment_id,
        created_at,
        updated_at,
        customer: map_customer(record)?,
        invoice_address: map_address(billing, AddressRole::Invoice)
            .map_err(|e| nested(e, "billing_address"))?,
        delivery_address: map_address(shipping, AddressRole::Delivery)
            .map_err(|e| nested(e, "shipping_address"))?,
        lines: map_order_lines(items)?,
    })
}

/// Parse a Magento timestamp.
///
/// Magento stores `YYYY-MM-DD HH:MM:SS` in UTC; RFC 3339 is accepted too.
pub fn parse_timestamp(field: &str, text: &str) -> Result<DateTime<Utc>> {
    let text = text.trim();

    if let Ok(naive) = NaiveDateTime::parse_from_str(text, MAGENTO_TIMESTAMP_FORMAT) {
        return Ok(naive.and_utc());
    }

    DateTime::parse_from_rfc3339(text)
        .map(|ts| ts.with_timezone(&Utc))
        .map_err(|_| Error::mapping(field, format!("not a timestamp: {text:?}")))
}

/// Parse a decimal string such as `"19.9900"` into a finite `f64`
pub fn parse_decimal(field: &str, text: &str) -> Result<f64> {
    let trimmed = text.trim();
    match trimmed.parse::<f64>() {
        Ok(n) if n.is_finite() => Ok(n),
        _ => Err(Error::mapping(field, format!("not a number: {text:?}"))),
    }
}

// ============================================================================
// Field Access
// ============================================================================

fn scalar_text(field: &str, value: &Value) -> Result<String> {
    match value {
        Value::String(s) => Ok(s.clone()),
        Value::Number(n) => Ok(n.to_string()),
        other => Err(Error::mapping(
            field,
            format!("expected a text value, found {other}"),
        )),
    }
}

fn required_text(record: &Value, field: &str) -> Result<String> {
    match record.get(field) {
        Some(Value::Null) | None => Err(Error::mapping(field, "missing")),
        Some(value) => scalar_text(field, value),
    }
}

fn optional_text(record: &Value, field: &str) -> Result<Option<String>> {
    match record.get(field) {
        Some(Value::Null) | None => Ok(None),
        Some(value) => scalar_text(field, value).map(Some),
    }
}

fn required_object<'a>(record: &'a Value, field: &str) -> Result<&'a Value> {
    match record.get(field) {
        Some(value @ Value::Object(_)) => Ok(value),
        Some(Value::Null) | None => Err(Error::mapping(field, "missing")),
        Some(_) => Err(Error::mapping(field, "expected a record")),
    }
}

/// Street lines from Magento's newline-separated `street`, copied verbatim.
///
/// An empty street gives a single empty line.
fn street_lines(record: &Value) -> Result<Vec<String>> {
    match record.get("street") {
        Some(Value::Array(parts)) => parts
            .iter()
            .map(|part| scalar_text("street", part))
            .collect(),
        Some(Value::Null) | None => Err(Error::mapping("street", "missing")),
        Some(value) => Ok(scalar_text("street", value)?
            .split('\n')
            .map(str::to_string)
            .collect()),
    }
}

fn country_code(text: &str) -> Result<String> {
    let code = text.trim();
    if code.len() == 2 && code.chars().all(|c| c.is_ascii_alphabetic()) {
        Ok(code.to_ascii_uppercase())
    } else {
        Err(Error::mapping(
            "country_id",
            format!("not an ISO 3166-1 alpha-2 code: {text:?}"),
        ))
    }
}

/// Qualify a mapping error's field with its parent record
fn nested(err: Error, parent: &str) -> Error {
    match err {
        Error::Mapping { field, message } => Error::Mapping {
            field: format!("{parent}.{field}"),
            message,
        },
        other => other,
    }
}
