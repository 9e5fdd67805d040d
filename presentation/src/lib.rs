//! Presentation layer for confine
//!
//! This crate contains the CLI definition, the console progress reporter
//! that follows a run as it happens, and the final report formatting.

pub mod cli;
pub mod output;
pub mod progress;

// Re-export commonly used types
pub use cli::commands::Cli;
pub use output::console::ConsoleFormatter;
pub use progress::reporter::ConsoleProgress;
