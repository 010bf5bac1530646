//! Chat command implementations.

pub mod analyze;
pub mod depth;
pub mod help;
pub mod pattern;
pub mod registry;
pub mod report;
pub mod schedule;
pub mod themes;
pub mod tremors;

pub use registry::{CommandContext, CommandRegistry};
