//! Adapters for the engine's outbound ports.

mod reqwest_client;
mod system_clock;

pub use reqwest_client::ReqwestHttpTransport;
pub use system_clock::SystemClock;
