//! Domain layer - Core types with no knowledge of concrete infrastructure
//! 
//! This layer contains:
//! - Entities: Core objects (User, Message, Command, Event)
//! - Traits: Abstractions for infrastructure (Bot gateway, ModuleFinder, ExtensionHost)

pub mod entities;
pub mod traits;
