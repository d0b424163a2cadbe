//! Clock port for time-related operations

use chrono::{DateTime, Local};

/// Port for getting the current local time.
///
/// Date and time prompts start from "now", and timestamp variables format
/// it; tests substitute a fixed clock.
pub trait Clock: Send + Sync {
    /// Returns the current local timestamp.
    fn now(&self) -> DateTime<Local>;
}
