//! Command-line driver for nomen.
//!
//! `nomen` loads a JSON type model, builds a resolution context from flags
//! and `nomen.json`, and prints what a name resolves to.
pub mod args;
pub mod config;
pub mod driver;
pub mod reporter;
