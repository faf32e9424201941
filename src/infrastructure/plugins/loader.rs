//! Native extension loader - Opens shared libraries exporting an extension unit

use std::path::Path;
use libloading::{Library, Symbol};
use crate::application::bot::TutorialBot;
use crate::application::errors::{BotError, PluginError};
use crate::application::extensions::Extension;

/// Signature of the exported entry point.
///
/// The library returns `Box::into_raw(Box::new(Box::new(unit) as Box<dyn Extension>))`.
/// Host and library must be built by the same compiler.
pub type ExtensionInitFn = unsafe extern "C" fn() -> *mut Box<dyn Extension>;

/// An extension unit living in a shared library
pub struct NativeExtension {
    // Dropped before the library that holds its code
    instance: Box<dyn Extension>,
    _library: Library,
}

impl Extension for NativeExtension {
    fn name(&self) -> &str {
        self.instance.name()
    }

    fn setup(&self, bot: &mut TutorialBot) -> Result<(), BotError> {
        self.instance.setup(bot)
    }
}

/// Native extension loader
pub struct NativeLoader;

impl NativeLoader {
    /// Open `path` and call the exported `symbol` to obtain the unit
    pub fn load(path: &Path, symbol: &str) -> Result<NativeExtension, PluginError> {
        if !path.exists() {
            return Err(PluginError::LibraryNotFound(path.to_path_buf()));
        }

        // Load the library
        let library = unsafe {
            Library::new(path).map_err(|source| PluginError::Library {
                path: path.to_path_buf(),
                source,
            })?
        };

        let instance = unsafe {
            let init_fn: Symbol<ExtensionInitFn> =
                library
                    .get(symbol.as_bytes())
                    .map_err(|source| PluginError::Symbol {
                        symbol: symbol.to_string(),
                        source,
                    })?;

            let raw = init_fn();
            if raw.is_null() {
                return Err(PluginError::NullInstance(symbol.to_string()));
            }
            *Box::from_raw(raw)
        };

        tracing::info!("Loaded native extension {} from {}", instance.name(), path.display());

        Ok(NativeExtension {
            instance,
            _library: library,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_library() {
        let err = NativeLoader::load(Path::new("/nonexistent/libghost.so"), "setup")
            .err()
            .unwrap();
        assert!(matches!(err, PluginError::LibraryNotFound(_)));
    }

    #[test]
    fn test_file_that_is_not_a_library() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("libbogus.so");
        std::fs::write(&path, b"not an elf").unwrap();

        let err = NativeLoader::load(&path, "setup").err().unwrap();
        assert!(matches!(err, PluginError::Library { .. }));
    }
}
