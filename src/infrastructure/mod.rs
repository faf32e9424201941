//! Infrastructure layer - External concerns
//!
//! This layer contains:
//! - Config: Settings file and environment overrides
//! - Modules: Filesystem module finder and manifests
//! - Plugins: Native extension libraries
//! - Adapters: Gateway integrations (console)

pub mod adapters;
pub mod config;
pub mod http;
pub mod logging;
pub mod modules;
pub mod plugins;
