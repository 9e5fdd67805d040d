//! Raw TOML configuration data types
//!
//! These structs mirror the config file layout. Every section has defaults,
//! so a partial (or absent) file is valid.

use std::path::PathBuf;
use std::time::Duration;

use confine_application::ExecutionParams;
use confine_domain::DEFAULT_MAX_ITERATIONS;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::providers::gemini::DEFAULT_MODEL;
use crate::tools::{DEFAULT_MAX_FILE_CHARS, ToolSettings};

/// Configuration validation errors
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigValidationError {
    #[error("{0} cannot be 0")]
    ZeroTimeout(&'static str),

    #[error("agent.max_iterations cannot be 0")]
    ZeroIterations,

    #[error("execution.max_file_chars cannot be 0")]
    ZeroFileChars,

    #[error("model name cannot be empty")]
    EmptyModelName,
}

/// Agent loop configuration (`[agent]` section)
///
/// ```toml
/// [agent]
/// model = "gemini-2.0-flash-001"
/// max_iterations = 5
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileAgentConfig {
    /// Gemini model name
    pub model: String,
    /// Model rounds before the run is reported exhausted
    pub max_iterations: usize,
}

impl Default for FileAgentConfig {
    fn default() -> Self {
        Self {
            model: DEFAULT_MODEL.to_string(),
            max_iterations: DEFAULT_MAX_ITERATIONS,
        }
    }
}

/// Sandbox configuration (`[sandbox]` section)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileSandboxConfig {
    /// Directory every tool is confined to
    pub working_dir: PathBuf,
}

impl Default for FileSandboxConfig {
    fn default() -> Self {
        Self {
            working_dir: PathBuf::from("."),
        }
    }
}

/// Subprocess and read limits (`[execution]` section)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileExecutionConfig {
    /// Budget for scripts and git, in seconds
    pub interactive_timeout_secs: u64,
    /// Budget for test runners and linters, in seconds
    pub check_timeout_secs: u64,
    /// Characters returned by `get_file_content` before truncation
    pub max_file_chars: usize,
}

impl Default for FileExecutionConfig {
    fn default() -> Self {
        Self {
            interactive_timeout_secs: 30,
            check_timeout_secs: 60,
            max_file_chars: DEFAULT_MAX_FILE_CHARS,
        }
    }
}

/// Conversation log (`[logging]` section)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileLoggingConfig {
    /// JSONL file receiving model responses and tool traffic
    #[serde(skip_serializing_if = "Option::is_none")]
    pub conversation_log: Option<PathBuf>,
}

/// Complete configuration file structure
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileConfig {
    pub agent: FileAgentConfig,
    pub sandbox: FileSandboxConfig,
    pub execution: FileExecutionConfig,
    pub logging: FileLoggingConfig,
}

impl FileConfig {
    /// Validate the configuration and return an error if invalid
    pub fn validate(&self) -> Result<(), ConfigValidationError> {
        if self.agent.model.trim().is_empty() {
            return Err(ConfigValidationError::EmptyModelName);
        }
        if self.agent.max_iterations == 0 {
            return Err(ConfigValidationError::ZeroIterations);
        }
        if self.execution.interactive_timeout_secs == 0 {
            return Err(ConfigValidationError::ZeroTimeout(
                "execution.interactive_timeout_secs",
            ));
        }
        if self.execution.check_timeout_secs == 0 {
            return Err(ConfigValidationError::ZeroTimeout(
                "execution.check_timeout_secs",
            ));
        }
        if self.execution.max_file_chars == 0 {
            return Err(ConfigValidationError::ZeroFileChars);
        }
        Ok(())
    }

    pub fn tool_settings(&self) -> ToolSettings {
        ToolSettings {
            interactive_timeout: Duration::from_secs(self.execution.interactive_timeout_secs),
            check_timeout: Duration::from_secs(self.execution.check_timeout_secs),
            max_file_chars: self.execution.max_file_chars,
        }
    }

    pub fn execution_params(&self) -> ExecutionParams {
        ExecutionParams::default().with_max_iterations(self.agent.max_iterations)
    }
}
