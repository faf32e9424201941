//! Native extension units
//! 
//! A shared library becomes an extension unit when its manifest names the
//! library and the exported symbol to call.

pub mod loader;

pub use loader::{ExtensionInitFn, NativeExtension, NativeLoader};
