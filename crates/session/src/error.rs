use thiserror::Error;

use grocer_core::{DomainError, SessionId};

#[derive(Debug, Error)]
pub enum SessionError {
    /// A session lock was poisoned by a panic in another caller.
    #[error("session state lock poisoned")]
    Poisoned,

    #[error("unknown session: {0}")]
    UnknownSession(SessionId),

    #[error(transparent)]
    Domain(#[from] DomainError),
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("invalid value for {key}: '{value}' ({reason})")]
    InvalidValue {
        key: &'static str,
        value: String,
        reason: String,
    },
}

impl ConfigError {
    pub fn invalid(key: &'static str, value: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidValue {
            key,
            value: value.into(),
            reason: reason.into(),
        }
    }
}
