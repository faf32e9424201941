//! tutorialbot - A chat bot that discovers and loads its extensions from a package tree

pub mod application;
pub mod domain;
pub mod extensions;
pub mod infrastructure;
