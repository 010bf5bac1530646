//! Chat protocol handling: command parsing and dispatch.

pub mod handler;
pub mod parser;

pub use handler::ChatHandler;
pub use parser::{is_command, parse_command};
