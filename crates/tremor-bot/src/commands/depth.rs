//! Command /depth: Spiral depth of the registry or of one document.

use std::path::PathBuf;

use crate::run_blocking;
use crate::types::{BotResult, ChatReply, CommandDefinition};

use super::CommandContext;

pub fn definition() -> CommandDefinition {
    CommandDefinition::new(
        "depth",
        "/depth [path]",
        "Spiral depth of the whole registry, or of a document (which is then recorded)",
    )
}

pub async fn execute(args: &str, ctx: &CommandContext) -> BotResult<ChatReply> {
    let path = (!args.is_empty()).then(|| PathBuf::from(args));
    let document = path.clone();
    let depth = run_blocking(&ctx.engine, move |engine| {
        Ok(engine.get_spiral_depth(document.as_deref())?)
    })
    .await?;

    let title = match path {
        Some(p) => format!("Spiral Depth: {}", p.display()),
        None => "Spiral Depth".to_string(),
    };

    Ok(ChatReply::new(title)
        .with_body(depth.description.clone())
        .inline_field("Level", depth.level.label())
        .inline_field("Score", format!("{:.1}", depth.depth_score))
        .inline_field("Active Tremors", depth.active_tremor_count.to_string()))
}
