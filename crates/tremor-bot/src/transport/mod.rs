//! Transport layer for chat messages.

pub mod framing;
pub mod stdio;

pub use stdio::StdioTransport;
