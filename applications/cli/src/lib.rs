//! CineVault CLI Library
//!
//! Configuration, terminal adapters and rendering for the `cinevault` binary.
//!
//! This library exposes these pieces for testing purposes.

pub mod config;
pub mod error;
pub mod terminal;

// Re-export commonly used types for convenience
pub use config::AppConfig;
pub use error::{CliError, Result};
pub use terminal::{TerminalNavigator, TerminalNotifier};
