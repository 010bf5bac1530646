//! Command: /help

use crate::types::{BotResult, ChatReply, CommandDefinition};

use super::{CommandContext, CommandRegistry};

pub fn definition() -> CommandDefinition {
    CommandDefinition::new("help", "/help", "Show available commands")
}

pub async fn execute(_args: &str, _ctx: &CommandContext) -> BotResult<ChatReply> {
    let reply = CommandRegistry::list_commands()
        .into_iter()
        .fold(ChatReply::new("Tremor Bot Commands"), |reply, cmd| {
            reply.field(cmd.usage, cmd.description)
        });
    Ok(reply)
}
