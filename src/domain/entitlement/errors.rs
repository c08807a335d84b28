//! Entitlement error types.

use thiserror::Error;

use crate::domain::foundation::{DomainError, ErrorCode};

/// Errors surfaced by the entitlement engine.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EntitlementError {
    /// The backing store could not be read or written. The host should
    /// offer a retry.
    #[error("Entitlement state unavailable: {0}")]
    PersistenceUnavailable(String),

    /// A tier identifier outside the catalog was supplied.
    #[error("Invalid plan tier: {0}")]
    InvalidTier(String),
}

impl EntitlementError {
    pub fn persistence(reason: impl Into<String>) -> Self {
        EntitlementError::PersistenceUnavailable(reason.into())
    }

    pub fn invalid_tier(tier: impl Into<String>) -> Self {
        EntitlementError::InvalidTier(tier.into())
    }

    pub fn is_retryable(&self) -> bool {
        matches!(self, EntitlementError::PersistenceUnavailable(_))
    }

    pub fn code(&self) -> ErrorCode {
        match self {
            EntitlementError::PersistenceUnavailable(_) => ErrorCode::PersistenceUnavailable,
            EntitlementError::InvalidTier(_) => ErrorCode::InvalidTier,
        }
    }
}

impl From<EntitlementError> for DomainError {
    fn from(err: EntitlementError) -> Self {
        DomainError::new(err.code(), err.to_string())
    }
}
