//! All data types used by the bot.

pub mod command;
pub mod error;
pub mod message;

pub use command::*;
pub use error::*;
pub use message::*;
