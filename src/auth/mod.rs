//! Authentication module
//!
//! Magento's SOAP API authenticates with a session identifier obtained from
//! `login`. The `SessionCache` keeps it for the lifetime of a client and
//! guarantees a single login even under concurrent first use.

mod session;

pub use session::{SessionCache, SessionId, SessionState};
