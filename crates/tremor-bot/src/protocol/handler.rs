//! Main message dispatcher: receives chat messages, routes commands.

use std::sync::Arc;

use crate::commands::{CommandContext, CommandRegistry};
use crate::scheduler::TremorScheduler;
use crate::types::{ChatMessage, ChatReply};
use crate::SharedEngine;

use super::parser::{is_command, parse_command};

/// Dispatches inbound chat messages to commands.
pub struct ChatHandler {
    ctx: CommandContext,
}

impl ChatHandler {
    pub fn new(engine: SharedEngine, scheduler: Arc<TremorScheduler>) -> Self {
        Self {
            ctx: CommandContext { engine, scheduler },
        }
    }

    /// Handle one message. Ordinary chat traffic yields no reply.
    pub async fn handle_message(&self, msg: ChatMessage) -> Option<ChatReply> {
        if !is_command(&msg.content) {
            tracing::trace!("Ignoring non-command message");
            return None;
        }

        let reply = match parse_command(&msg.content) {
            Ok(call) => {
                tracing::debug!(command = %call.name, author = ?msg.author, "Dispatching command");
                match CommandRegistry::call(&call.name, &call.args, &self.ctx).await {
                    Ok(reply) => reply,
                    Err(e) => {
                        tracing::warn!(command = %call.name, "Command failed: {e}");
                        e.to_reply()
                    }
                }
            }
            Err(e) => e.to_reply(),
        };

        Some(reply.in_reply_to(msg.id))
    }
}
