//! Message parser - Parses raw messages into structured messages

use crate::domain::entities::{CommandKind, Content, Message, User};

/// Parses incoming text into Message objects.
///
/// `/name args` is a slash command; text starting with one of the command
/// prefixes is a prefix command.
#[derive(Debug, Clone)]
pub struct MessageParser {
    prefixes: Vec<String>,
}

impl MessageParser {
    pub fn new<I, S>(prefixes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            prefixes: prefixes
                .into_iter()
                .map(Into::into)
                .filter(|p: &String| !p.is_empty())
                .collect(),
        }
    }

    pub fn prefixes(&self) -> &[String] {
        &self.prefixes
    }

    /// Parse a text message
    pub fn parse(&self, channel_id: impl Into<String>, text: &str, author: Option<User>) -> Message {
        let text = text.trim();

        let command = if let Some(rest) = text.strip_prefix('/') {
            Some((CommandKind::Slash, rest))
        } else {
            self.prefixes
                .iter()
                .find_map(|p| text.strip_prefix(p.as_str()))
                .map(|rest| (CommandKind::Prefix, rest))
        };

        let content = match command {
            Some((kind, rest)) => Self::parse_command(kind, rest)
                .unwrap_or_else(|| Content::Text(text.to_string())),
            None => Content::Text(text.to_string()),
        };

        Message::new(channel_id, content).with_author_opt(author)
    }

    /// Split command and arguments; a bare sigil is not a command
    fn parse_command(kind: CommandKind, rest: &str) -> Option<Content> {
        let mut parts = rest.split_whitespace();
        let name = parts.next()?.to_string();
        let args = parts.map(|s| s.to_string()).collect();
        Some(Content::Command { kind, name, args })
    }
}
