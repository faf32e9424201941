//! Filesystem module finder
//!
//! Maps dotted names onto a directory tree below an ordered list of roots:
//!
//! - `a/b/` is a package. With a `mod.yaml` it is a regular package living in
//!   that one directory; without one it is a namespace package spanning every
//!   `a/b/` found under the parent's locations.
//! - `a/b.yaml` is a plain module.
//!
//! Lookups for `a.b` search only the locations of `a`, as imports do.
//!
//! Listings take every sub-directory whose name is an identifier as a
//! package, manifest or not, so a stray `target/` or `build/` below an
//! extension root is walked too. Hidden and non-identifier directories
//! (`.git`, `my-dir`) are never listed. Keep extension roots free of build
//! output, or name such directories in the ignore list.

pub mod manifest;

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use once_cell::sync::Lazy;
use regex_lite::Regex;

use crate::application::errors::ImportError;
use crate::domain::traits::{Module, ModuleFinder, ModuleInfo, ModuleSpec};

pub use manifest::{Manifest, MODULE_EXTENSION, PACKAGE_MANIFEST};

static IDENTIFIER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z_][A-Za-z0-9_]*$").expect("identifier pattern is valid"));

fn is_identifier(name: &str) -> bool {
    IDENTIFIER.is_match(name)
}

enum Located {
    Package {
        locations: Vec<PathBuf>,
        manifest: Option<PathBuf>,
    },
    Module(PathBuf),
}

/// Module finder over the filesystem
#[derive(Debug, Clone)]
pub struct FsModuleFinder {
    roots: Vec<PathBuf>,
}

impl FsModuleFinder {
    pub fn new(roots: Vec<PathBuf>) -> Self {
        Self { roots }
    }

    /// Finder rooted at the current working directory
    pub fn from_cwd() -> Result<Self, ImportError> {
        Ok(Self::new(vec![std::env::current_dir()?]))
    }

    pub fn roots(&self) -> &[PathBuf] {
        &self.roots
    }

    fn locate(&self, name: &str) -> Result<Option<Located>, ImportError> {
        let (parent_locations, local) = match name.rsplit_once('.') {
            Some((parent, local)) => match self.locate(parent)? {
                Some(Located::Package { locations, .. }) => (locations, local),
                _ => return Ok(None),
            },
            None => (self.roots.clone(), name),
        };

        if !is_identifier(local) {
            return Ok(None);
        }

        let mut portions = Vec::new();
        for base in &parent_locations {
            let dir = base.join(local);
            if dir.is_dir() {
                let manifest = dir.join(PACKAGE_MANIFEST);
                if manifest.is_file() {
                    let dir = std::fs::canonicalize(&dir)?;
                    return Ok(Some(Located::Package {
                        manifest: Some(dir.join(PACKAGE_MANIFEST)),
                        locations: vec![dir],
                    }));
                }
            }

            let file = base.join(format!("{}.{}", local, MODULE_EXTENSION));
            if file.is_file() {
                return Ok(Some(Located::Module(file)));
            }

            if dir.is_dir() {
                portions.push(std::fs::canonicalize(&dir)?);
            }
        }

        if portions.is_empty() {
            Ok(None)
        } else {
            Ok(Some(Located::Package {
                locations: portions,
                manifest: None,
            }))
        }
    }

    fn list_dir(path: &Path) -> Result<Vec<(String, bool)>, ImportError> {
        let mut entries = Vec::new();
        for entry in std::fs::read_dir(path)? {
            let entry = match entry {
                Ok(e) => e,
                Err(e) => {
                    tracing::warn!("Failed to read directory entry in {}: {}", path.display(), e);
                    continue;
                }
            };
            let entry_path = entry.path();
            let Some(file_name) = entry_path.file_name().and_then(|n| n.to_str()) else {
                continue;
            };

            if entry_path.is_dir() {
                if is_identifier(file_name) {
                    entries.push((file_name.to_string(), file_name.to_string(), true));
                }
                continue;
            }

            if file_name == PACKAGE_MANIFEST {
                continue;
            }
            if let Some(stem) = file_name.strip_suffix(&format!(".{}", MODULE_EXTENSION)) {
                if is_identifier(stem) {
                    entries.push((file_name.to_string(), stem.to_string(), false));
                }
            }
        }

        entries.sort_by(|a, b| a.0.cmp(&b.0));
        Ok(entries
            .into_iter()
            .map(|(_, name, is_package)| (name, is_package))
            .collect())
    }
}

impl ModuleFinder for FsModuleFinder {
    fn find_spec(&self, name: &str) -> Result<Option<ModuleSpec>, ImportError> {
        Ok(self.locate(name)?.map(|located| ModuleSpec {
            name: name.to_string(),
            search_locations: match located {
                Located::Package { locations, .. } => locations,
                Located::Module(_) => Vec::new(),
            },
        }))
    }

    fn iter_modules(&self, paths: &[PathBuf], prefix: &str) -> Result<Vec<ModuleInfo>, ImportError> {
        let mut seen = HashSet::new();
        let mut infos = Vec::new();

        for path in paths {
            if !path.is_dir() {
                continue;
            }
            for (local, is_package) in Self::list_dir(path)? {
                if seen.insert(local.clone()) {
                    infos.push(ModuleInfo {
                        name: format!("{}{}", prefix, local),
                        is_package,
                    });
                }
            }
        }

        Ok(infos)
    }

    fn import(&self, name: &str) -> Result<Module, ImportError> {
        let located = self
            .locate(name)?
            .ok_or_else(|| ImportError::NotFound(name.to_string()))?;

        let (manifest_path, search_locations) = match located {
            Located::Package { locations, manifest } => (manifest, locations),
            Located::Module(file) => (Some(file), Vec::new()),
        };

        let entry_point = match manifest_path {
            Some(path) => {
                let manifest = Manifest::from_file(&path)?;
                let base_dir = path.parent().unwrap_or(Path::new("."));
                manifest.entry_point(base_dir)
            }
            None => None,
        };

        tracing::trace!("Imported {}", name);

        Ok(Module {
            name: name.to_string(),
            entry_point,
            search_locations,
        })
    }
}
