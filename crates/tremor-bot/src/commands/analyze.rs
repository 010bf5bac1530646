//! Command /analyze: Scan text for themes without recording it.

use crate::types::{BotError, BotResult, ChatReply, CommandDefinition};

use super::CommandContext;

pub fn definition() -> CommandDefinition {
    CommandDefinition::new(
        "analyze",
        "/analyze <text>",
        "Detect themes, intensity and depth in a piece of text",
    )
}

pub async fn execute(args: &str, ctx: &CommandContext) -> BotResult<ChatReply> {
    if args.is_empty() {
        return Err(BotError::InvalidArgs("Usage: /analyze <text>".to_string()));
    }

    let analysis = ctx.engine.lock().await.detect_patterns(args, None)?;

    let body = if analysis.is_empty() {
        "No patterns detected".to_string()
    } else if analysis.quake_detected {
        format!(
            "QUAKE DETECTED: a theme exceeded intensity {:.1}\nDetected {} themes",
            tremor_engine::QUAKE_THRESHOLD,
            analysis.theme_count()
        )
    } else {
        format!("Detected {} themes", analysis.theme_count())
    };

    let mut reply = ChatReply::new("Pattern Analysis").with_body(body);
    for detection in &analysis.detected_themes {
        reply = reply.field(
            detection.theme.clone(),
            format!(
                "{} occurrences, intensity {:.1}\nkeywords: {}",
                detection.total_occurrences,
                detection.intensity,
                detection.keywords_found.join(", ")
            ),
        );
    }

    Ok(reply
        .inline_field("Depth Score", format!("{:.1}", analysis.depth_score))
        .inline_field("Pattern Count", analysis.total_pattern_count.to_string()))
}
