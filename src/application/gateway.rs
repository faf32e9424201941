//! Gateway runner - Drives a bot session until it ends or shutdown is requested

use std::future::Future;

use crate::application::bot::TutorialBot;
use crate::application::errors::BotError;
use crate::domain::entities::{Event, Message};
use crate::domain::traits::Bot;

/// Log in, announce readiness, then answer messages.
///
/// Returns when the session runs out of messages or `shutdown` completes.
/// The session is closed in both cases.
pub async fn run_gateway<B, F>(bot: &TutorialBot, gateway: &B, shutdown: F) -> Result<(), BotError>
where
    B: Bot + ?Sized,
    F: Future<Output = ()>,
{
    gateway.start().await?;
    bot.dispatch(&Event::Ready(gateway.bot_info()))?;

    tokio::pin!(shutdown);
    let result = loop {
        tokio::select! {
            _ = &mut shutdown => {
                tracing::info!("Shutdown requested");
                break Ok(());
            }
            next = gateway.next_message() => match next {
                Ok(Some(message)) => handle_message(bot, gateway, message).await,
                Ok(None) => break Ok(()),
                Err(e) => break Err(e),
            }
        }
    };

    gateway.close().await?;
    result
}

async fn handle_message<B>(bot: &TutorialBot, gateway: &B, message: Message)
where
    B: Bot + ?Sized,
{
    let channel_id = message.channel_id.clone();
    let reply = match bot.dispatch(&Event::Message(message)) {
        Ok(Some(reply)) => reply,
        Ok(None) => return,
        Err(e) => {
            tracing::warn!("Command failed: {}", e);
            format!("Error: {}", e)
        }
    };

    if let Err(e) = gateway.send_message(&channel_id, &reply).await {
        tracing::error!("Failed to send reply to {}: {}", channel_id, e);
    }
}
