// Allow common clippy pedantic lints that aren't critical for this codebase
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::too_many_lines)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::items_after_statements)]
#![allow(clippy::match_same_arms)]
#![allow(clippy::needless_pass_by_value)]

//! # Magento Order Connector
//!
//! Pulls orders out of a Magento 1.x shop through its SOAP v2 API and maps
//! them into a platform-neutral order model.
//!
//! ## Features
//!
//! - **WSDL discovery**: endpoint and SOAP actions read from the shop's WSDL
//! - **Single login**: one session per connector, shared by concurrent calls
//! - **Date-range listing**: orders created within an inclusive day range
//! - **Bounded fan-out**: order details fetched concurrently, list order kept
//! - **Typed failures**: connection, authentication, remote service, mapping
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use magento_connector::{Credentials, DateRange, MagentoConnector, Result};
//!
//! #[tokio::main]
//! async fn main() -> Result<()> {
//!     let credentials = Credentials::new("api-user", "api-key");
//!     let connector = MagentoConnector::connect("https://shop.example.com", credentials).await?;
//!
//!     let range = DateRange::new(
//!         chrono::NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
//!         chrono::NaiveDate::from_ymd_opt(2024, 1, 31).unwrap(),
//!     )?;
//!
//!     for order in connector.get_orders(&range).await? {
//!         println!("{} {}", order.increment_id, order.customer.email);
//!     }
//!
//!     Ok(())
//! }
//! ```
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                     MagentoConnector                        │
//! │  connect() → WSDL + login     get_orders(range) → Vec<Order>│
//! └─────────────────────────────────────────────────────────────┘
//!                               │
//! ┌────────────┬────────────────┼───────────────┬───────────────┐
//! │    Auth    │      SOAP      │     HTTP      │    Mapping    │
//! ├────────────┼────────────────┼───────────────┼───────────────┤
//! │ Session    │ WSDL           │ GET / POST    │ Customer      │
//! │ Single     │ Envelopes      │ Timeouts      │ Addresses     │
//! │ flight     │ Faults         │ SOAPAction    │ Order lines   │
//! └────────────┴────────────────┴───────────────┴───────────────┘
//! ```

#![allow(missing_docs)]
#![warn(clippy::all)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::doc_markdown)]

// ============================================================================
// Module declarations
// ============================================================================

/// Error types
pub mod error;

/// Common types: credentials and date ranges
pub mod types;

/// Platform-neutral order model
pub mod model;

/// HTTP transport
pub mod http;

/// SOAP envelopes, WSDL and faults
pub mod soap;

/// Session handling
pub mod auth;

/// Magento record mapping
pub mod mapping;

/// Connector trait and Magento connector
pub mod connector;

/// YAML configuration
pub mod config;

/// Template interpolation
pub mod template;

// ============================================================================
// Re-exports
// ============================================================================

pub use error::{Error, Result};
pub use types::*;

// Re-export commonly used types
pub use config::{load_config, load_config_from_str, ClientSettings, ConnectorConfig};
pub use connector::{MagentoConnector, OrderSource};
pub use model::{Address, AddressRole, Customer, Item, Order, OrderLine};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Crate name
pub const NAME: &str = env!("CARGO_PKG_NAME");
