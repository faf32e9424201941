use async_trait::async_trait;
use crate::domain::entities::Message;
use crate::application::errors::BotError;

/// Bot trait - abstraction for the gateway session a bot runs on
#[async_trait]
pub trait Bot: Send + Sync {
    /// Authenticate and open the session
    async fn start(&self) -> Result<(), BotError>;

    /// Wait for the next incoming message; `None` once the session is closed
    async fn next_message(&self) -> Result<Option<Message>, BotError>;

    /// Send a message to a channel, returning the sent message id
    async fn send_message(&self, channel_id: &str, text: &str) -> Result<String, BotError>;

    /// Close the session
    async fn close(&self) -> Result<(), BotError>;

    /// Get bot info
    fn bot_info(&self) -> BotInfo;
}

/// Bot information
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BotInfo {
    pub id: String,
    pub name: String,
}

impl std::fmt::Display for BotInfo {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}#{}", self.name, self.id)
    }
}
