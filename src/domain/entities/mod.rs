//! Domain entities - Core objects with no external dependencies

pub mod user;
pub mod message;
pub mod command;
pub mod event;

pub use user::User;
pub use message::{Message, Content};
pub use command::{Command, CommandKind, CommandRegistry};
pub use event::{Event, EventKind, Listener};
