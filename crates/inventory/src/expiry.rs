//! "Expiring soon" rules.

use core::str::FromStr;

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};

use grocer_core::DomainError;

/// Default look-ahead for "expiring soon" checks.
pub const DEFAULT_EXPIRY_WINDOW_DAYS: u32 = 3;

const SECONDS_PER_DAY: i64 = 86_400;

/// How an expiry date is compared against the current instant.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ExpiryMode {
    /// Calendar-day difference in `0..=window` (both ends inclusive).
    /// Already-expired items never match.
    #[default]
    DateWindow,
    /// Expiry taken as midnight of its date, subtracted from `now`, floored to
    /// whole days and compared with `<= window`. No lower bound, so expired
    /// items keep matching.
    Unclamped,
}

impl ExpiryMode {
    pub fn as_str(self) -> &'static str {
        match self {
            ExpiryMode::DateWindow => "date-window",
            ExpiryMode::Unclamped => "unclamped",
        }
    }

    /// Whether `expiry` falls inside the window relative to `now`.
    pub fn is_within(self, expiry: NaiveDate, window_days: u32, now: DateTime<Utc>) -> bool {
        let window = i64::from(window_days);
        match self {
            ExpiryMode::DateWindow => (0..=window).contains(&days_until(expiry, now)),
            ExpiryMode::Unclamped => {
                let expires_at = expiry.and_time(NaiveTime::MIN).and_utc();
                let remaining = expires_at.signed_duration_since(now).num_seconds();
                remaining.div_euclid(SECONDS_PER_DAY) <= window
            }
        }
    }
}

impl core::fmt::Display for ExpiryMode {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ExpiryMode {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "date-window" | "date_window" | "window" => Ok(ExpiryMode::DateWindow),
            "unclamped" => Ok(ExpiryMode::Unclamped),
            other => Err(DomainError::validation(format!(
                "unknown expiry mode '{other}' (expected 'date-window' or 'unclamped')"
            ))),
        }
    }
}

/// Calendar days from today (per `now`) until `date`; negative once passed.
pub fn days_until(date: NaiveDate, now: DateTime<Utc>) -> i64 {
    date.signed_duration_since(now.date_naive()).num_days()
}
