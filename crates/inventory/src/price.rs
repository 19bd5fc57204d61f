use serde::{Deserialize, Serialize};

use grocer_core::{DomainError, DomainResult, ValueObject};

/// Price of a grocery item in the session currency.
///
/// Stored as a float because prices come straight from a numeric form field
/// and totals are accumulated in call order.
#[derive(Debug, Clone, Copy, Default, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Price(f64);

impl Price {
    pub const ZERO: Price = Price(0.0);

    pub fn new(amount: f64) -> Self {
        Self(amount)
    }

    pub fn amount(self) -> f64 {
        self.0
    }

    /// Reject prices a form should never produce (negative, NaN, infinite).
    pub fn validate(self) -> DomainResult<Self> {
        if !self.0.is_finite() {
            return Err(DomainError::validation("price must be a finite number"));
        }
        if self.0 < 0.0 {
            return Err(DomainError::validation("price cannot be negative"));
        }
        Ok(self)
    }
}

impl ValueObject for Price {}

impl From<f64> for Price {
    fn from(value: f64) -> Self {
        Self(value)
    }
}

impl core::fmt::Display for Price {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{:.2}", self.0)
    }
}
