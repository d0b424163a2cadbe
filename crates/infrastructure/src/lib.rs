//! Courier Infrastructure - Adapters and implementations
//!
//! This crate provides concrete implementations of the ports
//! defined in the application layer, plus the file formats the engine
//! reads and writes.

pub mod adapters;
pub mod persistence;
pub mod scripting;
pub mod serialization;

pub use adapters::{ReqwestHttpTransport, SystemClock};
pub use persistence::{FileResponseStorage, FileVariableRepository, SettingsError, SettingsLoader};
pub use scripting::{ScriptParseError, parse_script, render_script};
pub use serialization::{
    SerializationError, from_json, from_json_bytes, read_json_file, to_json_stable,
    to_json_stable_bytes, write_json_file,
};
