//! Extension loader - Resolves an extension root and loads everything below it

use std::path::{Component, Path, PathBuf};

use super::walker::{Ignore, ModuleWalker};
use crate::application::errors::{DiscoveryError, ExtensionError};
use crate::domain::traits::{ExtensionHost, ModuleFinder};

/// Discovers extension names under a root package and registers them
pub struct ExtensionLoader<'a> {
    finder: &'a dyn ModuleFinder,
    cwd: Option<PathBuf>,
}

impl<'a> ExtensionLoader<'a> {
    pub fn new(finder: &'a dyn ModuleFinder) -> Self {
        Self { finder, cwd: None }
    }

    /// Resolve path-style roots against `cwd` instead of the process directory
    pub fn with_cwd(mut self, cwd: impl Into<PathBuf>) -> Self {
        self.cwd = Some(cwd.into());
        self
    }

    /// Find every extension below `root`.
    ///
    /// `root` is a dotted name (possibly relative to `package`) or a path
    /// inside the working directory.
    pub fn find_extensions(
        &self,
        root: &str,
        package: Option<&str>,
        ignore: Option<&Ignore>,
    ) -> Result<Vec<String>, DiscoveryError> {
        let root = if root.contains('/') || root.contains('\\') {
            let cwd = match &self.cwd {
                Some(cwd) => cwd.clone(),
                None => std::env::current_dir()?,
            };
            module_name_from_path(root, &cwd)?
        } else {
            root.to_string()
        };

        let name = resolve_name(&root, package)?;

        let spec = self
            .finder
            .find_spec(&name)
            .map_err(|source| DiscoveryError::Import {
                name: name.clone(),
                source,
            })?
            .ok_or_else(|| DiscoveryError::NotFound(name.clone()))?;

        if !spec.is_package() {
            return Err(DiscoveryError::NotAPackage(spec.name));
        }

        ModuleWalker::new(self.finder).walk(
            &spec.search_locations,
            &format!("{}.", spec.name),
            ignore,
        )
    }

    /// Load every extension below `root` into `host`.
    ///
    /// Resolution errors are returned. A single extension failing to load is
    /// logged and skipped; `on_loaded` runs for each one that succeeded.
    pub fn load_extensions<H>(
        &self,
        host: &mut H,
        root: &str,
        package: Option<&str>,
        ignore: Option<&Ignore>,
        mut on_loaded: Option<&mut dyn FnMut(&str)>,
    ) -> Result<(), DiscoveryError>
    where
        H: ExtensionHost + ?Sized,
    {
        for name in self.find_extensions(root, package, ignore)? {
            if let Err(e) = host.load_extension(&name) {
                tracing::error!("Failed to load extension: {}", name);
                tracing::error!("{}", format_error_chain(&e));
                continue;
            }

            if let Some(callback) = on_loaded.as_deref_mut() {
                callback(name.as_str());
            }
        }

        Ok(())
    }
}

/// Turn a path inside `cwd` into a dotted module name
pub fn module_name_from_path(root: &str, cwd: &Path) -> Result<String, DiscoveryError> {
    let path = PathBuf::from(root.replace('\\', "/"));
    let absolute = if path.is_absolute() {
        normalize(&path)
    } else {
        normalize(&cwd.join(&path))
    };

    let relative = absolute
        .strip_prefix(normalize(cwd))
        .map_err(|_| DiscoveryError::OutsideWorkingDirectory(path.clone()))?;

    let mut parts = Vec::new();
    for component in relative.components() {
        match component {
            Component::Normal(part) => parts.push(part.to_string_lossy().into_owned()),
            _ => return Err(DiscoveryError::OutsideWorkingDirectory(path)),
        }
    }

    Ok(parts.join("."))
}

fn normalize(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                if !out.pop() {
                    out.push("..");
                }
            }
            other => out.push(other.as_os_str()),
        }
    }
    out
}

/// Resolve a relative dotted name (`.x`, `..x`) against `package`
pub fn resolve_name(name: &str, package: Option<&str>) -> Result<String, DiscoveryError> {
    if !name.starts_with('.') {
        return Ok(name.to_string());
    }

    let package = package
        .filter(|p| !p.is_empty())
        .ok_or_else(|| DiscoveryError::RelativeName {
            name: name.to_string(),
            reason: "no anchor package given".to_string(),
        })?;

    let level = name.chars().take_while(|c| *c == '.').count();
    let bits: Vec<&str> = package.rsplitn(level, '.').collect();
    if bits.len() < level {
        return Err(DiscoveryError::RelativeName {
            name: name.to_string(),
            reason: format!("goes beyond top-level package '{}'", package),
        });
    }

    let base = bits[bits.len() - 1];
    let rest = &name[level..];
    if rest.is_empty() {
        Ok(base.to_string())
    } else {
        Ok(format!("{}.{}", base, rest))
    }
}

fn format_error_chain(err: &ExtensionError) -> String {
    let mut out = err.to_string();
    let mut source = std::error::Error::source(err);
    while let Some(cause) = source {
        out.push_str(&format!("\n  caused by: {}", cause));
        source = cause.source();
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::extensions::testing::MemoryFinder;
    use pretty_assertions::assert_eq;

    fn finder() -> MemoryFinder {
        MemoryFinder::new()
            .package("bot", None, &["/src/bot"])
            .dir("/src/bot", &[("extensions", true)])
            .package("bot.extensions", None, &["/src/bot/extensions"])
            .dir("/src/bot/extensions", &[("alpha", false), ("beta", false), ("gamma", true)])
            .module("bot.extensions.alpha", Some("alpha"))
            .module("bot.extensions.beta", Some("beta"))
            .package("bot.extensions.gamma", Some("gamma"), &["/src/bot/extensions/gamma"])
            .module("bot.core", None)
    }

    /// Host recording every attempt; names listed in `failing` are rejected
    #[derive(Default)]
    struct RecordingHost {
        attempts: Vec<String>,
        loaded: Vec<String>,
        failing: Vec<String>,
    }

    impl ExtensionHost for RecordingHost {
        fn load_extension(&mut self, name: &str) -> Result<(), ExtensionError> {
            self.attempts.push(name.to_string());
            if self.failing.iter().any(|f| f == name) {
                return Err(ExtensionError::failed(name, "setup raised"));
            }
            self.loaded.push(name.to_string());
            Ok(())
        }
    }

    #[test]
    fn test_resolve_name_absolute_passthrough() {
        assert_eq!(resolve_name("a.b", None).unwrap(), "a.b");
    }

    #[test]
    fn test_resolve_name_relative_levels() {
        assert_eq!(resolve_name(".x", Some("a.b.c")).unwrap(), "a.b.c.x");
        assert_eq!(resolve_name("..x", Some("a.b.c")).unwrap(), "a.b.x");
        assert_eq!(resolve_name("...", Some("a.b.c")).unwrap(), "a");
    }

    #[test]
    fn test_resolve_name_relative_errors() {
        assert!(matches!(
            resolve_name(".x", None),
            Err(DiscoveryError::RelativeName { .. })
        ));
        assert!(matches!(
            resolve_name("....x", Some("a.b")),
            Err(DiscoveryError::RelativeName { .. })
        ));
    }

    #[test]
    fn test_module_name_from_path() {
        let cwd = Path::new("/work");
        assert_eq!(
            module_name_from_path("./bot/extensions", cwd).unwrap(),
            "bot.extensions"
        );
        assert_eq!(
            module_name_from_path("bot/extensions/", cwd).unwrap(),
            "bot.extensions"
        );
        assert_eq!(
            module_name_from_path("bot\\extensions", cwd).unwrap(),
            "bot.extensions"
        );
        assert_eq!(
            module_name_from_path("/work/bot/extensions", cwd).unwrap(),
            "bot.extensions"
        );
        assert_eq!(
            module_name_from_path("bot/../bot/extensions", cwd).unwrap(),
            "bot.extensions"
        );
    }

    #[test]
    fn test_module_name_from_path_outside_cwd() {
        let cwd = Path::new("/work");
        for root in ["../outside", "/elsewhere/bot", "bot/../../x"] {
            assert!(
                matches!(
                    module_name_from_path(root, cwd),
                    Err(DiscoveryError::OutsideWorkingDirectory(_))
                ),
                "{root} should be rejected"
            );
        }
    }

    #[test]
    fn test_find_extensions_from_dotted_name() {
        let finder = finder();
        let names = ExtensionLoader::new(&finder)
            .find_extensions("bot.extensions", None, None)
            .unwrap();
        assert_eq!(
            names,
            vec!["bot.extensions.alpha", "bot.extensions.beta", "bot.extensions.gamma"]
        );
    }

    #[test]
    fn test_find_extensions_from_path_and_relative_name() {
        let finder = finder();
        let loader = ExtensionLoader::new(&finder).with_cwd("/src");

        let by_path = loader.find_extensions("./bot/extensions", None, None).unwrap();
        let by_relative = loader.find_extensions(".extensions", Some("bot"), None).unwrap();
        assert_eq!(by_path, by_relative);
        assert_eq!(by_path.len(), 3);
    }

    #[test]
    fn test_find_extensions_outside_cwd_rejected_before_lookup() {
        let finder = finder();
        let err = ExtensionLoader::new(&finder)
            .with_cwd("/src")
            .find_extensions("../outside", None, None)
            .unwrap_err();

        assert!(matches!(err, DiscoveryError::OutsideWorkingDirectory(_)));
        assert_eq!(finder.listings(), 0);
    }

    #[test]
    fn test_find_extensions_missing_root() {
        let finder = finder();
        let err = ExtensionLoader::new(&finder)
            .find_extensions("bot.nothing", None, None)
            .unwrap_err();
        assert!(matches!(err, DiscoveryError::NotFound(ref n) if n == "bot.nothing"));
    }

    #[test]
    fn test_find_extensions_plain_module_root() {
        let finder = finder();
        let err = ExtensionLoader::new(&finder)
            .find_extensions("bot.core", None, None)
            .unwrap_err();
        assert!(matches!(err, DiscoveryError::NotAPackage(ref n) if n == "bot.core"));
        assert_eq!(err.to_string(), "Module 'bot.core' is not a package");
    }

    #[test]
    fn test_load_extensions_continues_past_failure() {
        let finder = finder();
        let mut host = RecordingHost {
            failing: vec!["bot.extensions.beta".to_string()],
            ..Default::default()
        };

        let mut seen = Vec::new();
        let mut callback = |name: &str| seen.push(name.to_string());
        ExtensionLoader::new(&finder)
            .load_extensions(&mut host, "bot.extensions", None, None, Some(&mut callback))
            .unwrap();

        assert_eq!(host.attempts.len(), 3);
        assert_eq!(host.loaded, vec!["bot.extensions.alpha", "bot.extensions.gamma"]);
        assert_eq!(seen, vec!["bot.extensions.alpha", "bot.extensions.gamma"]);
    }

    #[test]
    fn test_load_extensions_propagates_resolution_errors() {
        let finder = finder();
        let mut host = RecordingHost::default();

        let err = ExtensionLoader::new(&finder)
            .load_extensions(&mut host, "bot.core", None, None, None)
            .unwrap_err();

        assert!(matches!(err, DiscoveryError::NotAPackage(_)));
        assert!(host.attempts.is_empty());
    }

    #[test]
    fn test_error_chain_includes_source() {
        let err = ExtensionError::failed("bot.extensions.beta", "setup raised");
        let chain = format_error_chain(&err);
        assert!(chain.contains("bot.extensions.beta"));
        assert!(chain.contains("caused by: setup raised"));
    }

    #[test]
    fn test_error_chain_lists_each_cause_once() {
        let err = ExtensionError::failed(
            "ext.alpha",
            crate::application::errors::BotError::Internal("setup exploded".to_string()),
        );

        assert_eq!(
            format_error_chain(&err),
            "Extension 'ext.alpha' raised an error\n  caused by: Internal error: setup exploded"
        );
    }
}
