//! Command registration and dispatch.

use std::sync::Arc;

use crate::scheduler::TremorScheduler;
use crate::types::{BotError, BotResult, ChatReply, CommandDefinition};
use crate::SharedEngine;

use super::{analyze, depth, help, pattern, report, schedule, themes, tremors};

/// Services a command may use.
#[derive(Clone)]
pub struct CommandContext {
    pub engine: SharedEngine,
    pub scheduler: Arc<TremorScheduler>,
}

pub struct CommandRegistry;

impl CommandRegistry {
    pub fn list_commands() -> Vec<CommandDefinition> {
        vec![
            analyze::definition(),
            depth::definition(),
            pattern::definition(),
            tremors::definition(),
            themes::definition(),
            report::definition(),
            schedule::definition(),
            help::definition(),
        ]
    }

    pub async fn call(name: &str, args: &str, ctx: &CommandContext) -> BotResult<ChatReply> {
        match name {
            "analyze" => analyze::execute(args, ctx).await,
            "depth" => depth::execute(args, ctx).await,
            "pattern" => pattern::execute(args, ctx).await,
            "tremors" => tremors::execute(args, ctx).await,
            "themes" => themes::execute(args, ctx).await,
            "report" => report::execute(args, ctx).await,
            "schedule" => schedule::execute(args, ctx).await,
            "help" => help::execute(args, ctx).await,
            _ => Err(BotError::UnknownCommand(name.to_string())),
        }
    }
}
