//! Stdio transport: reads chat messages from stdin, writes replies to stdout.

use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt, BufReader};

use crate::protocol::ChatHandler;
use crate::types::{BotResult, ChatReply};

use super::framing;

/// Newline-delimited JSON transport for a chat gateway process.
pub struct StdioTransport {
    handler: ChatHandler,
}

impl StdioTransport {
    pub fn new(handler: ChatHandler) -> Self {
        Self { handler }
    }

    /// Run the transport loop on stdin/stdout until EOF.
    pub async fn run(&self) -> BotResult<()> {
        let reader = BufReader::new(tokio::io::stdin());
        let writer = tokio::io::stdout();
        self.run_with(reader, writer).await
    }

    /// Run the transport loop over any line reader and writer.
    pub async fn run_with<R, W>(&self, mut reader: R, mut writer: W) -> BotResult<()>
    where
        R: AsyncBufRead + Unpin,
        W: AsyncWrite + Unpin,
    {
        let mut line = String::new();
        tracing::info!("Stdio transport started");

        loop {
            line.clear();
            let bytes_read = reader.read_line(&mut line).await?;

            if bytes_read == 0 {
                tracing::info!("EOF on input, shutting down");
                break;
            }

            let trimmed = line.trim();
            if trimmed.is_empty() {
                continue;
            }

            let reply = match framing::parse_message(trimmed) {
                Ok(msg) => self.handler.handle_message(msg).await,
                Err(e) => {
                    tracing::warn!("Parse error: {e}");
                    Some(e.to_reply())
                }
            };

            if let Some(reply) = reply {
                write_reply(&mut writer, &reply).await?;
            }
        }

        Ok(())
    }
}

async fn write_reply<W: AsyncWrite + Unpin>(writer: &mut W, reply: &ChatReply) -> BotResult<()> {
    let framed = framing::frame_reply(reply)?;
    writer.write_all(framed.as_bytes()).await?;
    writer.flush().await?;
    Ok(())
}
