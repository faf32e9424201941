//! Gateway adapters

pub mod console;

pub use console::ConsoleAdapter;
