//! Module walker - Recursive discovery of extension units
//!
//! Lists one package level at a time through a [`ModuleFinder`] and decides
//! for every child whether it is an extension unit (plain module, or package
//! declaring `setup`) or a grouping package to descend into.

use std::collections::HashSet;
use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;

use crate::application::errors::DiscoveryError;
use crate::domain::traits::ModuleFinder;

/// Predicate deciding whether a candidate name is skipped
pub type IgnorePredicate = Arc<dyn Fn(&str) -> bool + Send + Sync>;

/// Caller-supplied filter for discovery.
///
/// `Text` is what a lone string converts into. It is always rejected, since
/// callers passing one almost always meant a one-element prefix list.
#[derive(Clone)]
pub enum Ignore {
    Text(String),
    Prefixes(Vec<String>),
    Predicate(IgnorePredicate),
}

impl Ignore {
    pub fn prefixes<I, S>(prefixes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Ignore::Prefixes(prefixes.into_iter().map(Into::into).collect())
    }

    pub fn predicate<F>(predicate: F) -> Self
    where
        F: Fn(&str) -> bool + Send + Sync + 'static,
    {
        Ignore::Predicate(Arc::new(predicate))
    }

    fn compile(&self) -> Result<IgnoreFilter<'_>, DiscoveryError> {
        match self {
            Ignore::Text(text) => Err(DiscoveryError::InvalidIgnore(text.clone())),
            Ignore::Prefixes(prefixes) => Ok(IgnoreFilter::Prefixes(prefixes)),
            Ignore::Predicate(predicate) => Ok(IgnoreFilter::Predicate(predicate)),
        }
    }
}

impl fmt::Debug for Ignore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Ignore::Text(text) => f.debug_tuple("Text").field(text).finish(),
            Ignore::Prefixes(prefixes) => f.debug_tuple("Prefixes").field(prefixes).finish(),
            Ignore::Predicate(_) => f.write_str("Predicate(..)"),
        }
    }
}

impl From<&str> for Ignore {
    fn from(text: &str) -> Self {
        Ignore::Text(text.to_string())
    }
}

impl From<String> for Ignore {
    fn from(text: String) -> Self {
        Ignore::Text(text)
    }
}

impl From<Vec<String>> for Ignore {
    fn from(prefixes: Vec<String>) -> Self {
        Ignore::Prefixes(prefixes)
    }
}

impl From<&[&str]> for Ignore {
    fn from(prefixes: &[&str]) -> Self {
        Ignore::prefixes(prefixes.iter().copied())
    }
}

impl<const N: usize> From<[&str; N]> for Ignore {
    fn from(prefixes: [&str; N]) -> Self {
        Ignore::prefixes(prefixes)
    }
}

enum IgnoreFilter<'a> {
    Prefixes(&'a [String]),
    Predicate(&'a IgnorePredicate),
}

impl IgnoreFilter<'_> {
    fn matches(&self, name: &str) -> bool {
        match self {
            IgnoreFilter::Prefixes(prefixes) => prefixes.iter().any(|p| name.starts_with(p.as_str())),
            IgnoreFilter::Predicate(predicate) => predicate(name),
        }
    }
}

/// Walks package directories and collects extension names
pub struct ModuleWalker<'a> {
    finder: &'a dyn ModuleFinder,
}

impl<'a> ModuleWalker<'a> {
    pub fn new(finder: &'a dyn ModuleFinder) -> Self {
        Self { finder }
    }

    /// Collect every extension name below `paths`.
    ///
    /// Names are `prefix` plus the child's local name. Output is depth-first
    /// in listing order. Each physical directory is walked at most once.
    pub fn walk(
        &self,
        paths: &[PathBuf],
        prefix: &str,
        ignore: Option<&Ignore>,
    ) -> Result<Vec<String>, DiscoveryError> {
        let filter = ignore.map(Ignore::compile).transpose()?;

        let mut visited = HashSet::new();
        let roots: Vec<PathBuf> = paths
            .iter()
            .filter(|p| visited.insert((*p).clone()))
            .cloned()
            .collect();

        let mut names = Vec::new();
        self.walk_level(&roots, prefix, filter.as_ref(), &mut visited, &mut names)?;
        Ok(names)
    }

    fn walk_level(
        &self,
        paths: &[PathBuf],
        prefix: &str,
        filter: Option<&IgnoreFilter<'_>>,
        visited: &mut HashSet<PathBuf>,
        names: &mut Vec<String>,
    ) -> Result<(), DiscoveryError> {
        let children = self
            .finder
            .iter_modules(paths, prefix)
            .map_err(|source| DiscoveryError::Import {
                name: prefix.trim_end_matches('.').to_string(),
                source,
            })?;

        for child in children {
            if filter.is_some_and(|f| f.matches(&child.name)) {
                tracing::debug!("Ignoring {}", child.name);
                continue;
            }

            if !child.is_package {
                names.push(child.name);
                continue;
            }

            let module = self
                .finder
                .import(&child.name)
                .map_err(|source| DiscoveryError::Import {
                    name: child.name.clone(),
                    source,
                })?;

            if module.has_setup() {
                names.push(child.name);
                continue;
            }

            let sub_paths: Vec<PathBuf> = module
                .search_locations
                .into_iter()
                .filter(|p| visited.insert(p.clone()))
                .collect();

            if sub_paths.is_empty() {
                tracing::debug!("Package {} has no unvisited locations", child.name);
                continue;
            }

            self.walk_level(&sub_paths, &format!("{}.", child.name), filter, visited, names)?;
        }

        Ok(())
    }
}
