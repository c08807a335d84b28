//! Document store adapters.
//!
//! - `InMemoryStore` - process-local, for tests and development
//! - `FileStore` - one YAML file per collection

mod file_store;
mod in_memory;

pub use file_store::FileStore;
pub use in_memory::InMemoryStore;
