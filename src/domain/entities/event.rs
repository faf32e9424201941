use std::sync::Arc;

use super::Message;
use crate::domain::traits::BotInfo;

/// Gateway events delivered to listeners
#[derive(Debug, Clone)]
pub enum Event {
    /// The gateway session is established
    Ready(BotInfo),
    /// A message arrived in a channel the bot can see
    Message(Message),
}

impl Event {
    pub fn kind(&self) -> EventKind {
        match self {
            Event::Ready(_) => EventKind::Ready,
            Event::Message(_) => EventKind::Message,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    Ready,
    Message,
}

/// Event listener attached by an extension
pub type Listener = Arc<dyn Fn(&Event) + Send + Sync>;
