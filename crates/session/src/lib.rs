//! Session context for the grocery tracker.
//!
//! A `GrocerySession` pairs one `Inventory` with one `SpendLedger` and is the
//! only thing a presentation layer talks to. There is no global state: create a
//! session per user session (or let `SessionRegistry` key them) and pass it
//! explicitly.

pub mod config;
pub mod context;
pub mod error;
pub mod registry;
pub mod report;

pub use config::TrackerConfig;
pub use context::GrocerySession;
pub use error::{ConfigError, SessionError};
pub use registry::SessionRegistry;
pub use report::{Dashboard, ExpiringEntry, ExpiryNotice, ItemView, SpendingSummary};
