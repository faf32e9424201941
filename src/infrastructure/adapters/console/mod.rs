//! Console adapter for development/testing

use async_trait::async_trait;
use std::sync::atomic::{AtomicBool, Ordering};
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt, BufReader, Lines};
use tokio::sync::Mutex;
use crate::application::errors::BotError;
use crate::application::messaging::MessageParser;
use crate::domain::entities::{Message, User};
use crate::domain::traits::{Bot, BotInfo};

/// Channel every console message arrives on
pub const CONSOLE_CHANNEL: &str = "console";

type Input = Lines<Box<dyn AsyncBufRead + Send + Unpin>>;
type Output = Box<dyn AsyncWrite + Send + Unpin>;

/// Gateway stand-in reading lines from stdin and replying on stdout
pub struct ConsoleAdapter {
    info: BotInfo,
    parser: MessageParser,
    author: User,
    activity: String,
    input: Mutex<Input>,
    output: Mutex<Output>,
    closed: AtomicBool,
}

impl ConsoleAdapter {
    pub fn new(name: impl Into<String>, parser: MessageParser) -> Self {
        Self::with_io(
            name,
            parser,
            BufReader::new(tokio::io::stdin()),
            tokio::io::stdout(),
        )
    }

    /// Adapter over arbitrary streams
    pub fn with_io<R, W>(name: impl Into<String>, parser: MessageParser, input: R, output: W) -> Self
    where
        R: AsyncBufRead + Send + Unpin + 'static,
        W: AsyncWrite + Send + Unpin + 'static,
    {
        let name = name.into();
        let input: Box<dyn AsyncBufRead + Send + Unpin> = Box::new(input);
        Self {
            info: BotInfo {
                id: CONSOLE_CHANNEL.to_string(),
                name,
            },
            parser,
            author: User::new("0", "console"),
            activity: "Listening to the console".to_string(),
            input: Mutex::new(input.lines()),
            output: Mutex::new(Box::new(output)),
            closed: AtomicBool::new(false),
        }
    }

    /// Status line shown once the session starts
    pub fn with_activity(mut self, activity: impl Into<String>) -> Self {
        self.activity = activity.into();
        self
    }

    pub fn activity(&self) -> &str {
        &self.activity
    }

    async fn write_line(&self, line: &str) -> Result<(), BotError> {
        let mut output = self.output.lock().await;
        output
            .write_all(format!("{}\n", line).as_bytes())
            .await
            .map_err(|e| BotError::Gateway(format!("Failed to write to console: {}", e)))?;
        output
            .flush()
            .await
            .map_err(|e| BotError::Gateway(format!("Failed to flush console: {}", e)))
    }
}

#[async_trait]
impl Bot for ConsoleAdapter {
    async fn start(&self) -> Result<(), BotError> {
        tracing::info!("Starting console session as {} ({})", self.info, self.activity);
        self.write_line(&format!("[{}] {}", self.info.name, self.activity)).await
    }

    async fn next_message(&self) -> Result<Option<Message>, BotError> {
        let mut input = self.input.lock().await;
        loop {
            if self.closed.load(Ordering::SeqCst) {
                return Ok(None);
            }

            let line = input
                .next_line()
                .await
                .map_err(|e| BotError::Gateway(format!("Failed to read console: {}", e)))?;

            match line {
                Some(line) if line.trim().is_empty() => continue,
                Some(line) => {
                    return Ok(Some(self.parser.parse(
                        CONSOLE_CHANNEL,
                        &line,
                        Some(self.author.clone()),
                    )))
                }
                None => return Ok(None),
            }
        }
    }

    async fn send_message(&self, _channel_id: &str, text: &str) -> Result<String, BotError> {
        self.write_line(&format!("[{}] {}", self.info.name, text)).await?;
        Ok(uuid::Uuid::new_v4().to_string())
    }

    async fn close(&self) -> Result<(), BotError> {
        if !self.closed.swap(true, Ordering::SeqCst) {
            tracing::info!("Console session closed");
        }
        Ok(())
    }

    fn bot_info(&self) -> BotInfo {
        self.info.clone()
    }
}
