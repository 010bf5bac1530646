//! Slash-command parsing.

use crate::types::{BotError, BotResult, CommandCall};

/// Whether a chat message is addressed to the bot.
pub fn is_command(content: &str) -> bool {
    content.trim_start().starts_with('/')
}

/// Parse `/name args...` into a [`CommandCall`]. The name is lower-cased.
pub fn parse_command(content: &str) -> BotResult<CommandCall> {
    let body = content
        .trim()
        .strip_prefix('/')
        .ok_or_else(|| BotError::InvalidRequest("Commands start with '/'".to_string()))?;

    let (name, args) = match body.split_once(char::is_whitespace) {
        Some((name, args)) => (name, args.trim()),
        None => (body, ""),
    };

    if name.is_empty() {
        return Err(BotError::InvalidRequest("Empty command name".to_string()));
    }

    Ok(CommandCall {
        name: name.to_lowercase(),
        args: args.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_command() {
        assert!(is_command("/help"));
        assert!(is_command("  /depth"));
        assert!(!is_command("hello /help"));
        assert!(!is_command(""));
    }

    #[test]
    fn test_parse_name_and_args() {
        let call = parse_command("/Analyze  the mirror\nand the void ").unwrap();
        assert_eq!(call.name, "analyze");
        assert_eq!(call.args, "the mirror\nand the void");

        let bare = parse_command("/tremors").unwrap();
        assert_eq!(bare.name, "tremors");
        assert_eq!(bare.args, "");
    }

    #[test]
    fn test_parse_rejects_empty_name() {
        assert!(matches!(parse_command("/"), Err(BotError::InvalidRequest(_))));
        assert!(matches!(parse_command("/ help"), Err(BotError::InvalidRequest(_))));
        assert!(parse_command("help").is_err());
    }
}
