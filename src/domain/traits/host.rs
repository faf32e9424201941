use crate::application::errors::ExtensionError;

/// Something extensions can be registered into.
///
/// Callers must serialise loads against one host; `&mut self` enforces it.
pub trait ExtensionHost {
    /// Import the named extension and run its entry point against this host
    fn load_extension(&mut self, name: &str) -> Result<(), ExtensionError>;
}
