//! Command definitions and parsed invocations.

use serde::{Deserialize, Serialize};

/// A command the bot answers to.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommandDefinition {
    pub name: String,
    pub usage: String,
    pub description: String,
}

impl CommandDefinition {
    pub fn new(name: &str, usage: &str, description: &str) -> Self {
        Self {
            name: name.to_string(),
            usage: usage.to_string(),
            description: description.to_string(),
        }
    }
}

/// A parsed `/name args...` invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandCall {
    /// Lower-cased command name without the slash.
    pub name: String,
    /// Everything after the name, trimmed.
    pub args: String,
}
