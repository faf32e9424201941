use crate::domain::entities::{Command, CommandKind, CommandRegistry, Message, Content};
use crate::application::errors::CommandError;

/// Service for managing and executing commands
#[derive(Default)]
pub struct CommandService {
    registry: CommandRegistry,
}

impl CommandService {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, command: Command) {
        let (kind, name) = (command.kind, command.name.clone());
        if self.registry.register(command).is_some() {
            tracing::warn!("Replaced existing {} command {}", kind, name);
        }
    }

    pub fn registry(&self) -> &CommandRegistry {
        &self.registry
    }

    /// Run the command a message invokes.
    ///
    /// Plain text yields `Ok(None)`. An unknown prefix command is ignored
    /// the way text is, while an unknown slash command is an error, since the
    /// gateway only delivers slash commands the bot announced. `help` falls
    /// back to the generated command list.
    pub fn handle(&self, message: &Message) -> Result<Option<String>, CommandError> {
        let Content::Command { kind, name, args: _ } = &message.content else {
            return Ok(None);
        };

        let Some(cmd) = self.registry.find(*kind, name) else {
            if name.eq_ignore_ascii_case("help") {
                return Ok(Some(self.get_help(*kind, None)));
            }
            return match kind {
                CommandKind::Slash => Err(CommandError::NotFound(name.clone())),
                CommandKind::Prefix => {
                    tracing::debug!("Ignoring unknown prefix command {}", name);
                    Ok(None)
                }
            };
        };

        // Execute handler
        if let Some(handler) = &cmd.handler {
            Ok(Some(handler(message)?))
        } else {
            Ok(Some(format!("Command {} not implemented", cmd.name)))
        }
    }

    pub fn get_help(&self, kind: CommandKind, command: Option<&str>) -> String {
        let sigil = match kind {
            CommandKind::Slash => "/",
            CommandKind::Prefix => "",
        };

        if let Some(name) = command {
            if let Some(cmd) = self.registry.get(kind, name) {
                let mut help = format!("{}{} - {}", sigil, cmd.name, cmd.description.as_deref().unwrap_or("No description"));
                if let Some(text) = &cmd.help {
                    help.push_str(&format!("\n{}", text));
                }
                return help;
            }
            return format!("Command {}{} not found", sigil, name);
        }

        // List all commands
        let mut help = "Available commands:\n".to_string();
        for cmd in self.registry.of_kind(kind) {
            let about = cmd.help.as_deref().or(cmd.description.as_deref()).unwrap_or("");
            help.push_str(&format!("  {}{} - {}\n", sigil, cmd.name, about));
        }
        help
    }
}
