//! Command /schedule: Scheduler status.

use crate::types::{BotResult, ChatReply, CommandDefinition};

use super::CommandContext;

pub fn definition() -> CommandDefinition {
    CommandDefinition::new("schedule", "/schedule", "Show scheduler status and upcoming jobs")
}

pub async fn execute(_args: &str, ctx: &CommandContext) -> BotResult<ChatReply> {
    let status = ctx.scheduler.status();
    let next_run = status
        .next_run
        .map(|t| t.format("%Y-%m-%d %H:%M").to_string())
        .unwrap_or_else(|| "none".to_string());

    Ok(ChatReply::new("Scheduler")
        .inline_field("Running", if status.running { "yes" } else { "no" })
        .inline_field("Jobs", status.jobs_count.to_string())
        .inline_field("Next Run", next_run)
        .field("Schedule", status.jobs.join("\n")))
}
