//! Script surface for action lists.

mod parser;

pub use parser::{ScriptParseError, parse_script, render_script};
