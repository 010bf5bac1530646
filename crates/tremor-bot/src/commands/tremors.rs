//! Command /tremors: Registry summary, strongest tremors first.

use crate::types::{BotResult, ChatReply, CommandDefinition};

use super::CommandContext;

const MAX_LISTED: usize = 10;

pub fn definition() -> CommandDefinition {
    CommandDefinition::new(
        "tremors",
        "/tremors",
        "List recorded tremors by intensity",
    )
}

pub async fn execute(_args: &str, ctx: &CommandContext) -> BotResult<ChatReply> {
    let engine = ctx.engine.lock().await;
    let registry = engine.registry();

    if registry.count() == 0 {
        return Ok(ChatReply::new("Tremor Registry").with_body("No tremors recorded yet"));
    }

    let mut reply = ChatReply::new("Tremor Registry").with_body(format!(
        "{} active tremors across {} documents",
        registry.count(),
        registry.documents_analyzed.len()
    ));

    for tremor in registry.strongest(MAX_LISTED) {
        reply = reply.field(
            tremor.theme.clone(),
            format!(
                "intensity {:.1}, {} occurrences, {} documents",
                tremor.intensity,
                tremor.total_occurrences,
                tremor.source_documents.len()
            ),
        );
    }
    Ok(reply)
}
