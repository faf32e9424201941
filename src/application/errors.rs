//! Application layer errors

use std::path::PathBuf;
use thiserror::Error;

/// General bot errors
#[derive(Error, Debug)]
pub enum BotError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Discovery error: {0}")]
    Discovery(#[from] DiscoveryError),

    #[error("Extension error: {0}")]
    Extension(#[from] ExtensionError),

    #[error("Command error: {0}")]
    Command(#[from] CommandError),

    #[error("HTTP error: {0}")]
    Http(#[from] HttpError),

    #[error("Gateway error: {0}")]
    Gateway(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

/// Errors raised while resolving an extension root and walking it.
///
/// These are caller or configuration mistakes: the bootstrap treats them as
/// fatal.
#[derive(Error, Debug)]
pub enum DiscoveryError {
    #[error("`ignore` must be a list of prefixes or a predicate, got the bare string '{0}'")]
    InvalidIgnore(String),

    #[error("Paths outside the cwd are not supported ({0}). Try using the module name instead.")]
    OutsideWorkingDirectory(PathBuf),

    #[error("Cannot resolve relative name '{name}': {reason}")]
    RelativeName { name: String, reason: String },

    #[error("Unable to find root module '{0}'")]
    NotFound(String),

    #[error("Module '{0}' is not a package")]
    NotAPackage(String),

    #[error("Failed to import '{name}': {source}")]
    Import {
        name: String,
        #[source]
        source: ImportError,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors raised by a module finder when importing a single module.
#[derive(Error, Debug)]
pub enum ImportError {
    #[error("No module named '{0}'")]
    NotFound(String),

    #[error("Invalid manifest {path}: {reason}")]
    Manifest { path: PathBuf, reason: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Per-extension registration errors. The load loop logs these and moves on.
#[derive(Error, Debug)]
pub enum ExtensionError {
    #[error("Extension '{0}' is already loaded")]
    AlreadyLoaded(String),

    #[error("Extension '{0}' could not be found")]
    NotFound(String),

    #[error("Extension '{0}' has no 'setup' entry point")]
    NoEntryPoint(String),

    #[error("Extension '{name}' raised an error")]
    Failed {
        name: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },
}

impl ExtensionError {
    pub fn failed(
        name: impl Into<String>,
        source: impl Into<Box<dyn std::error::Error + Send + Sync>>,
    ) -> Self {
        ExtensionError::Failed {
            name: name.into(),
            source: source.into(),
        }
    }

    /// Name of the extension the error refers to
    pub fn name(&self) -> &str {
        match self {
            ExtensionError::AlreadyLoaded(name)
            | ExtensionError::NotFound(name)
            | ExtensionError::NoEntryPoint(name) => name,
            ExtensionError::Failed { name, .. } => name,
        }
    }
}

/// Command execution errors
#[derive(Error, Debug)]
pub enum CommandError {
    #[error("Command not found: {0}")]
    NotFound(String),
}

/// Configuration errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Missing required field: {0}")]
    MissingField(String),

    #[error("Invalid value: {0}")]
    InvalidValue(String),

    #[error("Parse error: {0}")]
    Parse(String),
}

/// HTTP helper errors
#[derive(Error, Debug)]
pub enum HttpError {
    #[error("Request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("Invalid header '{0}'")]
    InvalidHeader(String),

    #[error("No authenticated session has been created")]
    NoAuthSession,
}

/// Native extension library errors
#[derive(Error, Debug)]
pub enum PluginError {
    #[error("Library not found: {0}")]
    LibraryNotFound(PathBuf),

    #[error("Failed to load library {path}: {source}")]
    Library {
        path: PathBuf,
        #[source]
        source: libloading::Error,
    },

    #[error("Failed to find entry point '{symbol}': {source}")]
    Symbol {
        symbol: String,
        #[source]
        source: libloading::Error,
    },

    #[error("Entry point '{0}' returned null")]
    NullInstance(String),
}
