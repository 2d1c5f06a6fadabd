//! Normalized order model
//!
//! The shapes every connector produces, independent of the shop platform.
//! Each `Order` exclusively owns its customer, addresses and lines.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Which part of the order an address belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AddressRole {
    /// Billing address
    Invoice,
    /// Shipping address
    Delivery,
}

/// Customer who placed the order
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Customer {
    /// Given name
    pub first_name: String,
    /// Family name
    pub last_name: String,
    /// Contact email
    pub email: String,
}

/// Postal address with its role on the order
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Address {
    /// Invoice or delivery
    pub role: AddressRole,
    /// Street lines, in order
    pub street: Vec<String>,
    pub postal_code: String,
    pub city: String,
    /// ISO 3166-1 alpha-2, upper case
    pub country_code: String,
    /// Zero or more phone numbers
    #[serde(default)]
    pub phones: Vec<String>,
}

impl Address {
    /// Create an address without phone numbers
    pub fn new(
        role: AddressRole,
        street: Vec<String>,
        postal_code: impl Into<String>,
        city: impl Into<String>,
        country_code: impl Into<String>,
    ) -> Self {
        Self {
            role,
            street,
            postal_code: postal_code.into(),
            city: city.into(),
            country_code: country_code.into(),
            phones: Vec::new(),
        }
    }

    /// Append a phone number
    pub fn add_phone(&mut self, phone: impl Into<String>) {
        self.phones.push(phone.into());
    }
}

/// Product as it appears on an order line
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Item {
    pub name: String,
    pub sku: String,
    /// Unit price including tax
    pub price_with_tax: f64,
    pub weight: f64,
}

/// One product and the quantity ordered
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderLine {
    pub item: Item,
    pub quantity: f64,
}

impl OrderLine {
    /// Pair an item with its ordered quantity
    pub fn new(item: Item, quantity: f64) -> Self {
        Self { item, quantity }
    }
}

/// A sales order
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Order {
    /// Human-readable order number
    pub increment_id: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub customer: Customer,
    pub invoice_address: Address,
    pub delivery_address: Address,
    pub lines: Vec<OrderLine>,
}

impl Order {
    /// Sum of `price_with_tax * quantity` over all lines
    pub fn total_with_tax(&self) -> f64 {
        self.lines
            .iter()
            .map(|line| line.item.price_with_tax * line.quantity)
            .sum()
    }
}
