//! Application layer - Use cases and business logic
//! 
//! This layer contains:
//! - Bot: The host owning extensions, commands and listeners
//! - Extensions: Discovery and loading of extension units
//! - Gateway: Session loop answering messages
//! - Services: Command dispatch
//! - Messaging: Message parsing
//! - Errors: Error types for every layer

pub mod bot;
pub mod errors;
pub mod extensions;
pub mod gateway;
pub mod messaging;
pub mod services;
