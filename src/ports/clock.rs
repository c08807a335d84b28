//! Clock Port - the source of "now" for rollover and metrics windows.

use crate::domain::foundation::Timestamp;

/// Port for reading the current time.
pub trait Clock: Send + Sync {
    fn now(&self) -> Timestamp;
}
