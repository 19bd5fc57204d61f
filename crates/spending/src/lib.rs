//! Spending module (purchase history and totals).
//!
//! Pure domain logic only: no IO, no persistence concerns.

pub mod ledger;

pub use ledger::{DailyCount, SpendLedger, date_key};
