//! Message framing for newline-delimited JSON.

use crate::types::{BotError, BotResult, ChatMessage, ChatReply};

/// Parse a single line of text as a chat message.
pub fn parse_message(line: &str) -> BotResult<ChatMessage> {
    let trimmed = line.trim();
    if trimmed.is_empty() {
        return Err(BotError::ParseError("Empty message".to_string()));
    }

    serde_json::from_str(trimmed).map_err(|e| BotError::ParseError(e.to_string()))
}

/// Serialize a reply to a JSON line (with trailing newline).
pub fn frame_reply(reply: &ChatReply) -> BotResult<String> {
    let mut json = serde_json::to_string(reply)?;
    json.push('\n');
    Ok(json)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_errors() {
        assert!(matches!(parse_message("  "), Err(BotError::ParseError(_))));
        assert!(matches!(parse_message("{\"id\": 1}"), Err(BotError::ParseError(_))));
    }

    #[test]
    fn test_frame_is_single_line() {
        let reply = ChatReply::new("Depth").with_body("line one\nline two");
        let framed = frame_reply(&reply).unwrap();
        assert!(framed.ends_with('\n'));
        assert_eq!(framed.matches('\n').count(), 1);
    }
}
