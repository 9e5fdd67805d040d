//! Configuration file loading for confine
//!
//! This module handles file I/O and merging of configuration from multiple sources.
//! The priority order (highest to lowest):
//!
//! 1. `--config <path>` specified file
//! 2. Project root: `./confine.toml` or `./.confine.toml`
//! 3. Global: `$XDG_CONFIG_HOME/confine/config.toml` (or `~/.config/confine/config.toml`)
//! 4. Default values
//!
//! Command-line flags are applied on top by the binary.

mod file_config;
mod loader;

pub use file_config::{
    ConfigValidationError, FileAgentConfig, FileConfig, FileExecutionConfig, FileLoggingConfig,
    FileSandboxConfig,
};
pub use loader::ConfigLoader;
