use super::{CommandKind, User};
use chrono::{DateTime, Utc};

/// Parsed message content
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Content {
    Text(String),
    Command {
        kind: CommandKind,
        name: String,
        args: Vec<String>,
    },
}

impl Content {
    pub fn text(&self) -> Option<&str> {
        match self {
            Content::Text(s) => Some(s),
            _ => None,
        }
    }
}

/// Represents an incoming or outgoing message
#[derive(Debug, Clone)]
pub struct Message {
    pub id: String,
    pub channel_id: String,
    pub author: Option<User>,
    pub content: Content,
    pub timestamp: DateTime<Utc>,
}

impl Message {
    pub fn new(channel_id: impl Into<String>, content: Content) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            channel_id: channel_id.into(),
            author: None,
            content,
            timestamp: Utc::now(),
        }
    }

    pub fn from_text(channel_id: impl Into<String>, text: impl Into<String>) -> Self {
        Self::new(channel_id, Content::Text(text.into()))
    }

    pub fn from_command(
        channel_id: impl Into<String>,
        kind: CommandKind,
        name: impl Into<String>,
        args: Vec<String>,
    ) -> Self {
        Self::new(
            channel_id,
            Content::Command {
                kind,
                name: name.into(),
                args,
            },
        )
    }

    pub fn with_author(mut self, user: User) -> Self {
        self.author = Some(user);
        self
    }

    pub fn with_author_opt(mut self, user: Option<User>) -> Self {
        self.author = user;
        self
    }

    /// Name used when replying to the author
    pub fn author_name(&self) -> &str {
        self.author
            .as_ref()
            .map(|u| u.display_name())
            .unwrap_or("stranger")
    }
}
