//! Command /pattern: Define or replace a custom theme.

use crate::run_blocking;
use crate::types::{BotError, BotResult, ChatReply, CommandDefinition};

use super::CommandContext;

const USAGE: &str = "Usage: /pattern <name> <keyword, keyword, ...>";

pub fn definition() -> CommandDefinition {
    CommandDefinition::new(
        "pattern",
        "/pattern <name> <kw1, kw2, ...>",
        "Define a custom theme from comma-separated keywords",
    )
}

/// Split `name kw1, kw2` into the theme name and its keywords.
fn parse_args(args: &str) -> BotResult<(&str, Vec<String>)> {
    let (name, rest) = args
        .split_once(char::is_whitespace)
        .ok_or_else(|| BotError::InvalidArgs(USAGE.to_string()))?;

    let keywords: Vec<String> = rest
        .split(',')
        .map(str::trim)
        .filter(|k| !k.is_empty())
        .map(str::to_string)
        .collect();

    if keywords.is_empty() {
        return Err(BotError::InvalidArgs(USAGE.to_string()));
    }
    Ok((name, keywords))
}

pub async fn execute(args: &str, ctx: &CommandContext) -> BotResult<ChatReply> {
    let (name, keywords) = parse_args(args)?;
    let name = name.to_string();
    let definition = run_blocking(&ctx.engine, move |engine| {
        Ok(engine.define_custom_pattern(&name, &keywords)?)
    })
    .await?;

    Ok(ChatReply::new("Pattern Defined")
        .with_body(format!(
            "Theme '{}' now tracks {} keywords",
            definition.theme,
            definition.keywords.len()
        ))
        .field("Keywords", definition.keywords.join(", ")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_args() {
        let (name, keywords) = parse_args("flame fire,  ember ,").unwrap();
        assert_eq!(name, "flame");
        assert_eq!(keywords, vec!["fire", "ember"]);
    }

    #[test]
    fn test_parse_args_requires_keywords() {
        assert!(parse_args("flame").is_err());
        assert!(parse_args("flame , ,").is_err());
    }
}
