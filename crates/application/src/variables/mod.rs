//! Variable resolution
//!
//! [`VariableManager`] owns the values of one run and asks the
//! [`VariableTypeRegistry`] for the strategy of each variable kind.

pub mod date_format;
mod manager;
mod registry;
pub mod types;

pub use date_format::{DatePattern, DatePatternError};
pub use manager::VariableManager;
pub use registry::{ResolvedValue, VariableType, VariableTypeRegistry};
