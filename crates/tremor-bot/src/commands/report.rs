//! Command /report: Run the weekly tremor report now.

use crate::scheduler::JobKind;
use crate::types::{BotResult, ChatReply, CommandDefinition};

use super::CommandContext;

pub fn definition() -> CommandDefinition {
    CommandDefinition::new(
        "report",
        "/report",
        "Generate this week's tremor summary immediately",
    )
}

pub async fn execute(_args: &str, ctx: &CommandContext) -> BotResult<ChatReply> {
    let path = ctx
        .scheduler
        .run_now(JobKind::WeeklyTremors.name())
        .await?;
    Ok(ChatReply::new("Weekly Tremor Report")
        .with_body(format!("Summary written to {}", path.display())))
}
