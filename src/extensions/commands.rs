//! Greeting and ping commands

use crate::application::bot::TutorialBot;
use crate::application::errors::BotError;
use crate::application::extensions::Extension;
use crate::domain::entities::Command;

pub struct Commands;

impl Extension for Commands {
    fn name(&self) -> &str {
        "Commands"
    }

    fn setup(&self, bot: &mut TutorialBot) -> Result<(), BotError> {
        bot.add_command(
            Command::slash("hello")
                .with_description("Says hello")
                .with_handler(|msg| {
                    tracing::info!("{} used /hello in {}", msg.author_name(), msg.channel_id);
                    Ok(format!("Hello, {}!", msg.author_name()))
                }),
        );

        bot.add_command(
            Command::prefix("ping")
                .with_help("Responds with 'Pong!'")
                .with_handler(|msg| {
                    tracing::info!("{} used ,ping in {}", msg.author_name(), msg.channel_id);
                    Ok("Pong!".to_string())
                }),
        );

        tracing::info!("{} has been successfully initiated", self.name());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::extensions::testing::MemoryFinder;
    use crate::domain::entities::{CommandKind, Event, User};
    use pretty_assertions::assert_eq;
    use std::sync::Arc;

    fn bot() -> TutorialBot {
        let mut bot = TutorialBot::new(Arc::new(MemoryFinder::new()), [","]);
        Commands.setup(&mut bot).unwrap();
        bot
    }

    fn reply(bot: &TutorialBot, text: &str, author: Option<User>) -> Option<String> {
        let msg = bot.parser().parse("general", text, author);
        bot.dispatch(&Event::Message(msg)).unwrap()
    }

    #[test]
    fn test_hello_greets_author() {
        let bot = bot();
        let alice = User::new("42", "alice").with_global_name("Alice");

        assert_eq!(reply(&bot, "/hello", Some(alice)).as_deref(), Some("Hello, Alice!"));
        assert_eq!(reply(&bot, "/hello", None).as_deref(), Some("Hello, stranger!"));
    }

    #[test]
    fn test_ping_is_a_prefix_command() {
        let bot = bot();

        assert_eq!(reply(&bot, ",ping", None).as_deref(), Some("Pong!"));
        assert!(bot.commands().registry().get(CommandKind::Slash, "ping").is_none());
        assert_eq!(
            bot.commands().registry().get(CommandKind::Prefix, "ping").and_then(|c| c.help.as_deref()),
            Some("Responds with 'Pong!'")
        );
    }
}
