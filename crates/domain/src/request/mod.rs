//! Request types

mod header;
mod method;
mod resolved;

pub use header::Header;
pub use method::HttpMethod;
pub use resolved::ResolvedRequest;
