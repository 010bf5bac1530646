//! Error types and numeric error codes for the chat command surface.

use super::message::ChatReply;

/// Codes reported to chat callers, numbered after JSON-RPC 2.0.
pub mod error_codes {
    pub const PARSE_ERROR: i32 = -32700;
    pub const INVALID_REQUEST: i32 = -32600;
    pub const UNKNOWN_COMMAND: i32 = -32601;
    pub const INVALID_ARGS: i32 = -32602;
    pub const INTERNAL_ERROR: i32 = -32603;
}

/// Bot-specific error codes.
pub mod bot_error_codes {
    pub const ENGINE_ERROR: i32 = -32850;
    pub const SCHEDULER_ERROR: i32 = -32851;
    pub const UNKNOWN_JOB: i32 = -32852;
    pub const REPORT_ERROR: i32 = -32853;
    pub const CONFIG_ERROR: i32 = -32854;
}

/// All errors that can occur in the bot.
#[derive(thiserror::Error, Debug)]
pub enum BotError {
    #[error("Parse error: {0}")]
    ParseError(String),

    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("Unknown command: /{0}")]
    UnknownCommand(String),

    #[error("Invalid arguments: {0}")]
    InvalidArgs(String),

    #[error("Engine error: {0}")]
    Engine(String),

    #[error("Scheduler error: {0}")]
    Scheduler(String),

    #[error("Unknown job: {0}")]
    UnknownJob(String),

    #[error("Report error: {0}")]
    Report(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl BotError {
    pub fn code(&self) -> i32 {
        use bot_error_codes::*;
        use error_codes::*;
        match self {
            BotError::ParseError(_) => PARSE_ERROR,
            BotError::InvalidRequest(_) => INVALID_REQUEST,
            BotError::UnknownCommand(_) => UNKNOWN_COMMAND,
            BotError::InvalidArgs(_) => INVALID_ARGS,
            BotError::Io(_) => INTERNAL_ERROR,
            BotError::Engine(_) => ENGINE_ERROR,
            BotError::Scheduler(_) => SCHEDULER_ERROR,
            BotError::UnknownJob(_) => UNKNOWN_JOB,
            BotError::Report(_) => REPORT_ERROR,
            BotError::Config(_) => CONFIG_ERROR,
            BotError::Json(_) => PARSE_ERROR,
        }
    }

    /// Render the error as a chat reply.
    pub fn to_reply(&self) -> ChatReply {
        ChatReply::error(self.code(), self.to_string())
    }
}

impl From<tremor_engine::TremorError> for BotError {
    fn from(e: tremor_engine::TremorError) -> Self {
        match e {
            tremor_engine::TremorError::InvalidInput(msg)
            | tremor_engine::TremorError::InvalidPattern(msg) => BotError::InvalidArgs(msg),
            other => BotError::Engine(other.to_string()),
        }
    }
}

pub type BotResult<T> = Result<T, BotError>;
