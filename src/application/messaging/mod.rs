//! Message handling - Turning raw gateway text into structured messages

pub mod parser;

pub use parser::MessageParser;
