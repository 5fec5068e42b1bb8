//! Interactive command layer for taskpad.
//!
//! Parses console input, calls `taskpad_core` services and prints results.
//! No business rule lives here.

pub mod app;
pub mod command;
pub mod config;
pub mod console;
mod notes;
mod tasks;

pub use app::{App, Flow, HELP_TEXT};
pub use config::{AppConfig, ConfigError};
pub use console::Console;
