//! slsbench command line
//!
//! The binary wires the library crates to a terminal: `enrich` assigns
//! hints and writes an enriched document, `scenario` builds and saves a
//! scenario graph, `order` prints the execution order of a saved scenario.

#![allow(missing_docs)]

pub mod cli;
pub mod commands;
pub mod config;
pub mod logging;
pub mod terminal;

pub use cli::{Cli, Command};
pub use config::{ConfigError, Settings};
pub use terminal::TerminalSelector;
