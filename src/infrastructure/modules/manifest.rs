//! Module manifest definition

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use crate::application::errors::ImportError;
use crate::domain::traits::EntryPoint;

/// File marking a directory as a regular package
pub const PACKAGE_MANIFEST: &str = "mod.yaml";

/// Extension of plain module files
pub const MODULE_EXTENSION: &str = "yaml";

/// What a module or package declares about itself
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct Manifest {
    /// Entry point: built-in unit key, or symbol name when `library` is set
    #[serde(default)]
    pub setup: Option<String>,

    /// Shared library exporting `setup`, relative to the manifest
    #[serde(default)]
    pub library: Option<PathBuf>,

    #[serde(default)]
    pub description: Option<String>,

    #[serde(default)]
    pub version: Option<String>,
}

impl Manifest {
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ImportError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)?;
        Self::parse(&content, path)
    }

    /// Parse manifest text read from `path`; an empty file is an empty manifest
    pub fn parse(content: &str, path: &Path) -> Result<Self, ImportError> {
        if content.trim().is_empty() {
            return Ok(Self::default());
        }

        // A comment-only document is null
        serde_yaml::from_str::<Option<Self>>(content)
            .map(Option::unwrap_or_default)
            .map_err(|e| ImportError::Manifest {
                path: path.to_path_buf(),
                reason: e.to_string(),
            })
    }

    /// The entry point, with `library` made absolute against `base_dir`
    pub fn entry_point(&self, base_dir: &Path) -> Option<EntryPoint> {
        let setup = self.setup.clone()?;
        Some(EntryPoint {
            setup,
            library: self.library.as_ref().map(|lib| base_dir.join(lib)),
        })
    }
}
