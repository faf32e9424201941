//! Built-in extension units
//!
//! Manifests refer to these by key in their `setup` field:
//!
//! - `commands`: the `/hello` and `,ping` commands
//! - `eventscog`: gateway event logging

pub mod commands;
pub mod events;

pub use commands::Commands;
pub use events::EventsCog;

use crate::application::extensions::ExtensionCatalog;

/// Catalog holding every built-in unit
pub fn catalog() -> ExtensionCatalog {
    ExtensionCatalog::new()
        .with("commands", Commands)
        .with("eventscog", EventsCog)
}
