//! Command: /themes

use crate::types::{BotResult, ChatReply, CommandDefinition};

use super::CommandContext;

pub fn definition() -> CommandDefinition {
    CommandDefinition::new("themes", "/themes", "Show every theme and its keywords")
}

pub async fn execute(_args: &str, ctx: &CommandContext) -> BotResult<ChatReply> {
    let engine = ctx.engine.lock().await;
    let custom = &engine.registry().custom_patterns;
    let themes = engine.themes();

    let mut reply =
        ChatReply::new("Themes").with_body(format!("{} themes, {} custom", themes.len(), custom.len()));
    for theme in themes {
        let name = if custom.iter().any(|c| c.theme == theme.theme) {
            format!("{} (custom)", theme.theme)
        } else {
            theme.theme
        };
        reply = reply.field(name, theme.keywords.join(", "));
    }
    Ok(reply)
}
