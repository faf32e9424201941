//! Extension system for tutorialbot
//!
//! Extensions are units that attach commands and listeners to the bot in
//! their `setup` entry point. They live in a package tree: the walker finds
//! them, the loader registers each one with the bot.
//!
//! An entry point names either a unit compiled into the binary (looked up in
//! the [`ExtensionCatalog`]) or a symbol exported by a shared library.

pub mod loader;
pub mod walker;

#[cfg(test)]
pub(crate) mod testing;

use std::collections::HashMap;
use std::sync::Arc;

use crate::application::bot::TutorialBot;
use crate::application::errors::{BotError, ExtensionError};
use crate::domain::traits::EntryPoint;
use crate::infrastructure::plugins::NativeLoader;

pub use loader::{module_name_from_path, resolve_name, ExtensionLoader};
pub use walker::{Ignore, IgnorePredicate, ModuleWalker};

/// A loadable extension unit
pub trait Extension: Send + Sync {
    /// Unit name, used in logs
    fn name(&self) -> &str;

    /// Attach commands and listeners to the bot
    fn setup(&self, bot: &mut TutorialBot) -> Result<(), BotError>;
}

/// Startup-time registry of extension units compiled into the binary
#[derive(Clone, Default)]
pub struct ExtensionCatalog {
    builtins: HashMap<String, Arc<dyn Extension>>,
}

impl ExtensionCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a built-in unit under the key manifests refer to in `setup`
    pub fn register(&mut self, key: impl Into<String>, extension: Arc<dyn Extension>) {
        self.builtins.insert(key.into(), extension);
    }

    pub fn with(mut self, key: impl Into<String>, extension: impl Extension + 'static) -> Self {
        self.register(key, Arc::new(extension));
        self
    }

    pub fn get(&self, key: &str) -> Option<Arc<dyn Extension>> {
        self.builtins.get(key).cloned()
    }

    /// Built-in keys, sorted
    pub fn keys(&self) -> Vec<&str> {
        let mut keys: Vec<&str> = self.builtins.keys().map(String::as_str).collect();
        keys.sort_unstable();
        keys
    }

    /// Turn the entry point of extension `name` into a unit
    pub fn resolve(&self, name: &str, entry: &EntryPoint) -> Result<Arc<dyn Extension>, ExtensionError> {
        match &entry.library {
            Some(library) => NativeLoader::load(library, &entry.setup)
                .map(|ext| Arc::new(ext) as Arc<dyn Extension>)
                .map_err(|e| ExtensionError::failed(name, e)),
            None => self.get(&entry.setup).ok_or_else(|| {
                ExtensionError::failed(
                    name,
                    format!("no built-in extension registered as '{}'", entry.setup),
                )
            }),
        }
    }
}
