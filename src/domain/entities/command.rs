use std::collections::HashMap;
use std::fmt;

use crate::application::errors::CommandError;
use crate::domain::entities::Message;

/// How a command is invoked
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CommandKind {
    /// Application command, invoked as `/name`
    Slash,
    /// Text command, invoked with the configured prefix
    Prefix,
}

impl fmt::Display for CommandKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CommandKind::Slash => write!(f, "slash"),
            CommandKind::Prefix => write!(f, "prefix"),
        }
    }
}

/// Command handler function type
pub type CommandHandler = Box<dyn Fn(&Message) -> Result<String, CommandError> + Send + Sync>;

/// Represents a bot command
pub struct Command {
    pub name: String,
    pub kind: CommandKind,
    pub description: Option<String>,
    pub help: Option<String>,
    pub handler: Option<CommandHandler>,
}

impl Command {
    pub fn slash(name: impl Into<String>) -> Self {
        Self::new(name, CommandKind::Slash)
    }

    pub fn prefix(name: impl Into<String>) -> Self {
        Self::new(name, CommandKind::Prefix)
    }

    fn new(name: impl Into<String>, kind: CommandKind) -> Self {
        Self {
            name: name.into(),
            kind,
            description: None,
            help: None,
            handler: None,
        }
    }

    pub fn with_description(mut self, desc: impl Into<String>) -> Self {
        self.description = Some(desc.into());
        self
    }

    pub fn with_help(mut self, help: impl Into<String>) -> Self {
        self.help = Some(help.into());
        self
    }

    pub fn with_handler<F>(mut self, handler: F) -> Self
    where
        F: Fn(&Message) -> Result<String, CommandError> + Send + Sync + 'static,
    {
        self.handler = Some(Box::new(handler));
        self
    }

    pub fn matches(&self, kind: CommandKind, input: &str) -> bool {
        if self.kind != kind {
            return false;
        }
        self.name.eq_ignore_ascii_case(input)
    }
}

/// Command registry for managing available commands
#[derive(Default)]
pub struct CommandRegistry {
    commands: HashMap<(CommandKind, String), Command>,
}

impl CommandRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a command, returning the one it replaced
    pub fn register(&mut self, command: Command) -> Option<Command> {
        self.commands
            .insert((command.kind, command.name.clone()), command)
    }

    pub fn get(&self, kind: CommandKind, name: &str) -> Option<&Command> {
        self.commands.get(&(kind, name.to_string()))
    }

    pub fn find(&self, kind: CommandKind, input: &str) -> Option<&Command> {
        self.get(kind, input)
            .or_else(|| self.commands.values().find(|c| c.matches(kind, input)))
    }

    /// Commands of one kind, sorted by name
    pub fn of_kind(&self, kind: CommandKind) -> Vec<&Command> {
        let mut commands: Vec<&Command> = self
            .commands
            .values()
            .filter(|c| c.kind == kind)
            .collect();
        commands.sort_by(|a, b| a.name.cmp(&b.name));
        commands
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_same_name_different_kinds_coexist() {
        let mut registry = CommandRegistry::new();
        registry.register(Command::slash("ping"));
        registry.register(Command::prefix("ping"));

        assert_eq!(registry.len(), 2);
        assert!(registry.get(CommandKind::Slash, "ping").is_some());
        assert!(registry.get(CommandKind::Prefix, "ping").is_some());
    }

    #[test]
    fn test_find_matches_case_insensitively() {
        let mut registry = CommandRegistry::new();
        registry.register(Command::prefix("ping"));

        assert!(registry.find(CommandKind::Prefix, "PING").is_some());
        assert!(registry.find(CommandKind::Prefix, "p").is_none());
        assert!(registry.find(CommandKind::Slash, "ping").is_none());
    }

    #[test]
    fn test_register_replaces_existing() {
        let mut registry = CommandRegistry::new();
        assert!(registry.register(Command::slash("hello")).is_none());
        assert!(registry.register(Command::slash("hello")).is_some());
        assert_eq!(registry.len(), 1);
    }
}
