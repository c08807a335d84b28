//! Persistence Port - document storage for subscriber state and records.
//!
//! Every collection holds JSON documents addressed by a string key. The
//! core never assumes whether the backing store is local or remote.

use async_trait::async_trait;
use serde_json::{Map, Value};
use std::fmt;

use crate::domain::entitlement::EntitlementError;
use crate::domain::foundation::{DomainError, ErrorCode};

/// Collections the core reads and writes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Collection {
    /// Subscriber profiles; carries the `plan` tier id.
    Profiles,
    /// Monthly usage counter sets, keyed by user id.
    Usage,
    /// Brand deals.
    Contracts,
    /// Marketplace applications.
    Applications,
    /// Received payments.
    Revenue,
    /// Persisted per-user rollups, keyed by user id.
    UserMetrics,
}

impl Collection {
    /// Table / file name of the collection.
    pub fn name(&self) -> &'static str {
        match self {
            Collection::Profiles => "profiles",
            Collection::Usage => "usage",
            Collection::Contracts => "contracts",
            Collection::Applications => "applications",
            Collection::Revenue => "revenue",
            Collection::UserMetrics => "user_metrics",
        }
    }
}

impl fmt::Display for Collection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A conjunction of top-level field equalities.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct QueryFilter {
    fields: Map<String, Value>,
}

impl QueryFilter {
    /// Matches every document.
    pub fn all() -> Self {
        Self::default()
    }

    /// Adds `field == value` to the filter.
    pub fn eq(mut self, field: impl Into<String>, value: impl Into<Value>) -> Self {
        self.fields.insert(field.into(), value.into());
        self
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Whether a document satisfies every equality.
    pub fn matches(&self, doc: &Value) -> bool {
        self.fields
            .iter()
            .all(|(field, expected)| doc.get(field) == Some(expected))
    }

    /// The filter as a JSON object, suitable for containment queries.
    pub fn to_json(&self) -> Value {
        Value::Object(self.fields.clone())
    }
}

/// Errors that can occur during persistence operations.
#[derive(Debug, thiserror::Error)]
pub enum PersistenceError {
    #[error("Store unavailable: {0}")]
    Unavailable(String),

    #[error("Serialization failed: {0}")]
    Serialization(String),

    #[error("IO error: {0}")]
    Io(String),

    #[error("Database error: {0}")]
    Database(String),
}

impl From<std::io::Error> for PersistenceError {
    fn from(err: std::io::Error) -> Self {
        PersistenceError::Io(err.to_string())
    }
}

impl From<serde_json::Error> for PersistenceError {
    fn from(err: serde_json::Error) -> Self {
        PersistenceError::Serialization(err.to_string())
    }
}

impl From<PersistenceError> for EntitlementError {
    fn from(err: PersistenceError) -> Self {
        EntitlementError::persistence(err.to_string())
    }
}

impl From<PersistenceError> for DomainError {
    fn from(err: PersistenceError) -> Self {
        let code = match err {
            PersistenceError::Unavailable(_) | PersistenceError::Io(_) => {
                ErrorCode::PersistenceUnavailable
            }
            PersistenceError::Database(_) => ErrorCode::DatabaseError,
            PersistenceError::Serialization(_) => ErrorCode::InternalError,
        };
        DomainError::new(code, err.to_string())
    }
}

/// Port for reading and writing documents.
#[async_trait]
pub trait Persistence: Send + Sync {
    /// Fetch one document, `None` if the key is absent.
    async fn get(&self, collection: Collection, key: &str)
        -> Result<Option<Value>, PersistenceError>;

    /// Insert or replace a document.
    async fn put(
        &self,
        collection: Collection,
        key: &str,
        value: Value,
    ) -> Result<(), PersistenceError>;

    /// All documents in a collection matching the filter.
    async fn query(
        &self,
        collection: Collection,
        filter: &QueryFilter,
    ) -> Result<Vec<Value>, PersistenceError>;
}
