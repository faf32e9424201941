//! In-memory module finder for discovery and loading tests

use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use crate::application::errors::ImportError;
use crate::domain::traits::{EntryPoint, Module, ModuleFinder, ModuleInfo, ModuleSpec};

/// A fake package tree that records every listing and import it serves
#[derive(Default)]
pub struct MemoryFinder {
    dirs: HashMap<PathBuf, Vec<(String, bool)>>,
    modules: HashMap<String, Module>,
    broken: HashSet<String>,
    listed: Mutex<Vec<PathBuf>>,
    listing_calls: Mutex<usize>,
    imported: Mutex<Vec<String>>,
}

impl MemoryFinder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Declare the children of one directory, in listing order
    pub fn dir(mut self, path: &str, children: &[(&str, bool)]) -> Self {
        self.dirs.insert(
            PathBuf::from(path),
            children
                .iter()
                .map(|(name, is_package)| (name.to_string(), *is_package))
                .collect(),
        );
        self
    }

    pub fn package(mut self, name: &str, setup: Option<&str>, locations: &[&str]) -> Self {
        self.modules.insert(
            name.to_string(),
            Module {
                name: name.to_string(),
                entry_point: setup.map(entry),
                search_locations: locations.iter().map(PathBuf::from).collect(),
            },
        );
        self
    }

    pub fn module(mut self, name: &str, setup: Option<&str>) -> Self {
        self.modules.insert(
            name.to_string(),
            Module {
                name: name.to_string(),
                entry_point: setup.map(entry),
                search_locations: Vec::new(),
            },
        );
        self
    }

    /// Make importing `name` fail
    pub fn broken(mut self, name: &str) -> Self {
        self.broken.insert(name.to_string());
        self
    }

    pub fn listings(&self) -> usize {
        *self.listing_calls.lock().unwrap()
    }

    pub fn was_listed(&self, path: &str) -> bool {
        self.listed.lock().unwrap().iter().any(|p| p == Path::new(path))
    }

    pub fn was_imported(&self, name: &str) -> bool {
        self.imported.lock().unwrap().iter().any(|n| n == name)
    }
}

fn entry(setup: &str) -> EntryPoint {
    EntryPoint {
        setup: setup.to_string(),
        library: None,
    }
}

impl ModuleFinder for MemoryFinder {
    fn find_spec(&self, name: &str) -> Result<Option<ModuleSpec>, ImportError> {
        Ok(self.modules.get(name).map(|module| ModuleSpec {
            name: module.name.clone(),
            search_locations: module.search_locations.clone(),
        }))
    }

    fn iter_modules(&self, paths: &[PathBuf], prefix: &str) -> Result<Vec<ModuleInfo>, ImportError> {
        *self.listing_calls.lock().unwrap() += 1;

        let mut seen = HashSet::new();
        let mut infos = Vec::new();
        for path in paths {
            self.listed.lock().unwrap().push(path.clone());
            for (local, is_package) in self.dirs.get(path).into_iter().flatten() {
                if seen.insert(local.clone()) {
                    infos.push(ModuleInfo {
                        name: format!("{}{}", prefix, local),
                        is_package: *is_package,
                    });
                }
            }
        }
        Ok(infos)
    }

    fn import(&self, name: &str) -> Result<Module, ImportError> {
        self.imported.lock().unwrap().push(name.to_string());

        if self.broken.contains(name) {
            return Err(ImportError::Manifest {
                path: PathBuf::from(name),
                reason: "simulated failure".to_string(),
            });
        }
        self.modules
            .get(name)
            .cloned()
            .ok_or_else(|| ImportError::NotFound(name.to_string()))
    }
}
