//! Adapters - Implementations of port interfaces.
//!
//! Adapters connect the domain to external systems:
//! - `storage` - In-memory and YAML file document stores
//! - `postgres` - PostgreSQL JSONB document store
//! - `clock` - System and fixed clocks

pub mod clock;
pub mod postgres;
pub mod storage;

pub use clock::{FixedClock, SystemClock};
pub use postgres::PostgresStore;
pub use storage::{FileStore, InMemoryStore};
