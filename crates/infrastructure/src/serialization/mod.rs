//! JSON file format for shortcuts, variable stores and settings.
//!
//! Files are written with 2-space indentation and a trailing newline, and
//! replaced atomically so a crash never leaves half a file behind.

mod json;

pub use json::*;
