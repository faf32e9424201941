//! Domain traits - Abstractions for infrastructure implementations

pub mod bot;
pub mod finder;
pub mod host;

pub use bot::{Bot, BotInfo};
pub use finder::{EntryPoint, Module, ModuleFinder, ModuleInfo, ModuleSpec};
pub use host::ExtensionHost;
