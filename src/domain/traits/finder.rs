//! Module resolution and listing, as seen by extension discovery

use std::path::PathBuf;

use crate::application::errors::ImportError;

/// Where a dotted name lives
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModuleSpec {
    pub name: String,
    /// Directories holding the package's children; empty for plain modules
    pub search_locations: Vec<PathBuf>,
}

impl ModuleSpec {
    pub fn is_package(&self) -> bool {
        !self.search_locations.is_empty()
    }
}

/// One direct child yielded by a listing
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModuleInfo {
    pub name: String,
    pub is_package: bool,
}

/// The registration entry point a module declares
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntryPoint {
    /// Built-in unit key, or symbol name when `library` is set
    pub setup: String,
    /// Shared library providing the symbol
    pub library: Option<PathBuf>,
}

/// An imported module
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Module {
    pub name: String,
    pub entry_point: Option<EntryPoint>,
    pub search_locations: Vec<PathBuf>,
}

impl Module {
    pub fn has_setup(&self) -> bool {
        self.entry_point.is_some()
    }
}

/// Resolves dotted names and lists package contents
pub trait ModuleFinder: Send + Sync {
    /// Locate a module by absolute dotted name without importing it
    fn find_spec(&self, name: &str) -> Result<Option<ModuleSpec>, ImportError>;

    /// List the direct children of `paths`, one level only, each named `prefix + local`
    fn iter_modules(&self, paths: &[PathBuf], prefix: &str) -> Result<Vec<ModuleInfo>, ImportError>;

    /// Import a module, reading whatever it declares about itself
    fn import(&self, name: &str) -> Result<Module, ImportError>;
}
