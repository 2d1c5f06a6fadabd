//! Record mapping module
//!
//! Translates decoded Magento records into the order model.
//! All functions are pure; any missing or malformed field yields
//! `Error::Mapping` naming the field.

mod records;

pub use records::{
    map_address, map_customer, map_order, map_order_lines, parse_decimal, parse_timestamp,
    MAGENTO_TIMESTAMP_FORMAT,
};
