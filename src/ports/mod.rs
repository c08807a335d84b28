//! Ports - Interfaces for external dependencies.
//!
//! Following hexagonal architecture, ports define the contracts between
//! the domain and the outside world. Adapters implement these ports.
//!
//! - `Persistence` - Document store for profiles, usage, and raw records
//! - `Clock` - Current time for monthly rollover and metrics windows

mod clock;
mod persistence;

pub use clock::Clock;
pub use persistence::{Collection, Persistence, PersistenceError, QueryFilter};
