//! Connection proxying: framed transport and the per-session engine.

mod engine;
mod transport;

pub use engine::run_session;
pub use transport::{MessageReader, MessageWriter};
