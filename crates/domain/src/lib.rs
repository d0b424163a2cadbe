//! Courier Domain - Core types
//!
//! This crate defines the stored model of the shortcut engine: variables,
//! action records, shortcuts and the requests built from them.
//! All types here are pure Rust with no I/O dependencies.

pub mod action;
pub mod error;
pub mod id;
pub mod request;
pub mod settings;
pub mod shortcut;
pub mod variable;

pub use action::{ActionAlias, ActionData, ActionRecord};
pub use error::{DomainError, DomainResult};
pub use id::generate_id;
pub use request::{Header, HttpMethod, ResolvedRequest};
pub use settings::EngineSettings;
pub use shortcut::{ResponseHandling, Shortcut};
pub use variable::{Variable, VariableConfig, VariableKind, VariableValueMap, is_valid_key};
