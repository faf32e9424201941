//! Gateway event logging

use crate::application::bot::TutorialBot;
use crate::application::errors::BotError;
use crate::application::extensions::Extension;
use crate::domain::entities::{Event, EventKind};

pub struct EventsCog;

impl Extension for EventsCog {
    fn name(&self) -> &str {
        "EventsCog"
    }

    fn setup(&self, bot: &mut TutorialBot) -> Result<(), BotError> {
        bot.add_listener(EventKind::Ready, |event| {
            if let Event::Ready(info) = event {
                tracing::info!("{} is now ready and connected", info.name);
            }
        });

        tracing::info!("{} has been successfully initiated", self.name());
        Ok(())
    }
}
