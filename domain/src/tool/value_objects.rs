//! Tool domain value objects: immutable result and error types
//!
//! Every tool call yields a [`ToolResult`]. Failures never escape a tool as a
//! fault; they are carried as a [`ToolError`] whose [`ErrorCategory`] lets
//! callers (and tests) tell failure kinds apart without string matching.
//! The model only ever sees [`ToolResult::to_model_text`].

use serde::{Deserialize, Serialize};

use crate::sandbox::SandboxViolation;

/// Failure taxonomy for tool execution.
///
/// | Category | Meaning |
/// |----------|---------|
/// | `SandboxViolation` | Resolved path escapes the working root; no I/O happened |
/// | `NotFound` | Target file, directory or executable does not exist |
/// | `NotAFile` / `NotADirectory` | Wrong entry kind for the operation |
/// | `PermissionDenied` | OS-level access refusal |
/// | `DecodeError` | Content is not valid UTF-8 text |
/// | `Timeout` | External process exceeded its wall-clock budget |
/// | `ExternalToolMissing` | git, a linter or an interpreter is not installed |
/// | `InvalidArgument` | Missing or mistyped argument |
/// | `UnknownTool` | No tool registered under that name |
/// | `Unexpected` | Anything else, always with the underlying message |
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCategory {
    SandboxViolation,
    NotFound,
    NotAFile,
    NotADirectory,
    PermissionDenied,
    DecodeError,
    Timeout,
    ExternalToolMissing,
    InvalidArgument,
    UnknownTool,
    Unexpected,
}

impl ErrorCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCategory::SandboxViolation => "SANDBOX_VIOLATION",
            ErrorCategory::NotFound => "NOT_FOUND",
            ErrorCategory::NotAFile => "NOT_A_FILE",
            ErrorCategory::NotADirectory => "NOT_A_DIRECTORY",
            ErrorCategory::PermissionDenied => "PERMISSION_DENIED",
            ErrorCategory::DecodeError => "DECODE_ERROR",
            ErrorCategory::Timeout => "TIMEOUT",
            ErrorCategory::ExternalToolMissing => "EXTERNAL_TOOL_MISSING",
            ErrorCategory::InvalidArgument => "INVALID_ARGUMENT",
            ErrorCategory::UnknownTool => "UNKNOWN_TOOL",
            ErrorCategory::Unexpected => "UNEXPECTED_ERROR",
        }
    }
}

impl std::fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error that occurred during tool execution.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToolError {
    pub category: ErrorCategory,
    /// Human-readable error message, shown to the model
    pub message: String,
}

impl ToolError {
    pub fn new(category: ErrorCategory, message: impl Into<String>) -> Self {
        Self {
            category,
            message: message.into(),
        }
    }

    pub fn not_found(path: impl AsRef<str>) -> Self {
        Self::new(
            ErrorCategory::NotFound,
            format!("\"{}\" does not exist", path.as_ref()),
        )
    }

    pub fn not_a_file(path: impl AsRef<str>) -> Self {
        Self::new(
            ErrorCategory::NotAFile,
            format!("\"{}\" is not a regular file", path.as_ref()),
        )
    }

    pub fn not_a_directory(path: impl AsRef<str>) -> Self {
        Self::new(
            ErrorCategory::NotADirectory,
            format!("\"{}\" is not a directory", path.as_ref()),
        )
    }

    pub fn permission_denied(path: impl AsRef<str>) -> Self {
        Self::new(
            ErrorCategory::PermissionDenied,
            format!("Permission denied to access \"{}\"", path.as_ref()),
        )
    }

    pub fn decode_error(path: impl AsRef<str>) -> Self {
        Self::new(
            ErrorCategory::DecodeError,
            format!(
                "Unable to read \"{}\" as text: content is not valid UTF-8",
                path.as_ref()
            ),
        )
    }

    pub fn timeout(operation: impl AsRef<str>, secs: u64) -> Self {
        Self::new(
            ErrorCategory::Timeout,
            format!("{} timed out after {} seconds", operation.as_ref(), secs),
        )
    }

    pub fn external_tool_missing(program: impl AsRef<str>) -> Self {
        Self::new(
            ErrorCategory::ExternalToolMissing,
            format!(
                "'{}' is not installed or not found in PATH",
                program.as_ref()
            ),
        )
    }

    pub fn invalid_argument(message: impl Into<String>) -> Self {
        Self::new(ErrorCategory::InvalidArgument, message)
    }

    pub fn missing_argument(name: &str) -> Self {
        Self::invalid_argument(format!("Missing required argument: {}", name))
    }

    pub fn unknown_tool(name: impl AsRef<str>) -> Self {
        Self::new(
            ErrorCategory::UnknownTool,
            format!("Unknown function: {}", name.as_ref()),
        )
    }

    pub fn unexpected(message: impl std::fmt::Display) -> Self {
        Self::new(
            ErrorCategory::Unexpected,
            format!("An unexpected error occurred: {}", message),
        )
    }

    /// Map an I/O failure on `path` onto the taxonomy
    pub fn from_io(err: &std::io::Error, path: impl AsRef<str>) -> Self {
        use std::io::ErrorKind;
        match err.kind() {
            ErrorKind::NotFound => Self::not_found(path),
            ErrorKind::PermissionDenied => Self::permission_denied(path),
            ErrorKind::InvalidData => Self::decode_error(path),
            ErrorKind::IsADirectory => Self::not_a_file(path),
            ErrorKind::NotADirectory => Self::not_a_directory(path),
            _ => Self::unexpected(err),
        }
    }

    pub fn is(&self, category: ErrorCategory) -> bool {
        self.category == category
    }
}

impl From<SandboxViolation> for ToolError {
    fn from(violation: SandboxViolation) -> Self {
        Self::new(ErrorCategory::SandboxViolation, violation.to_string())
    }
}

impl std::fmt::Display for ToolError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}] {}", self.category, self.message)
    }
}

impl std::error::Error for ToolError {}

/// Result of a tool execution, carrying output or error information.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolResult {
    /// Name of the tool that was executed
    pub tool_name: String,
    /// Whether the execution was successful
    pub success: bool,
    /// Output content (for successful execution)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output: Option<String>,
    /// Error information (for failed execution)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<ToolError>,
    /// Metadata about the execution
    #[serde(default)]
    pub metadata: ToolResultMetadata,
}

/// Structured metadata about tool execution, used for progress and logs
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ToolResultMetadata {
    /// Duration of execution in milliseconds
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration_ms: Option<u64>,
    /// Size of the output in bytes
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bytes: Option<usize>,
}

impl ToolResult {
    /// Create a successful result
    pub fn success(tool_name: impl Into<String>, output: impl Into<String>) -> Self {
        let output = output.into();
        Self {
            tool_name: tool_name.into(),
            success: true,
            metadata: ToolResultMetadata {
                duration_ms: None,
                bytes: Some(output.len()),
            },
            output: Some(output),
            error: None,
        }
    }

    /// Create a failed result
    pub fn failure(tool_name: impl Into<String>, error: ToolError) -> Self {
        Self {
            tool_name: tool_name.into(),
            success: false,
            output: None,
            error: Some(error),
            metadata: ToolResultMetadata::default(),
        }
    }

    /// Build from a handler outcome
    pub fn from_outcome(tool_name: impl Into<String>, outcome: Result<String, ToolError>) -> Self {
        match outcome {
            Ok(output) => Self::success(tool_name, output),
            Err(error) => Self::failure(tool_name, error),
        }
    }

    /// Add duration metadata
    pub fn with_duration(mut self, duration_ms: u64) -> Self {
        self.metadata.duration_ms = Some(duration_ms);
        self
    }

    pub fn is_success(&self) -> bool {
        self.success
    }

    pub fn output(&self) -> Option<&str> {
        self.output.as_deref()
    }

    pub fn error(&self) -> Option<&ToolError> {
        self.error.as_ref()
    }

    /// The string fed back to the model: the output, or `Error: <message>`
    pub fn to_model_text(&self) -> String {
        match (&self.output, &self.error) {
            (_, Some(error)) => format!("Error: {}", error.message),
            (Some(output), None) => output.clone(),
            (None, None) => String::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_tool_error_display() {
        let err = ToolError::not_found("missing.txt");
        assert_eq!(err.category, ErrorCategory::NotFound);
        assert_eq!(err.to_string(), "[NOT_FOUND] \"missing.txt\" does not exist");
    }

    #[test]
    fn test_from_io_mapping() {
        let denied = std::io::Error::from(std::io::ErrorKind::PermissionDenied);
        assert!(ToolError::from_io(&denied, "x").is(ErrorCategory::PermissionDenied));

        let missing = std::io::Error::from(std::io::ErrorKind::NotFound);
        assert!(ToolError::from_io(&missing, "x").is(ErrorCategory::NotFound));

        let other = std::io::Error::other("disk on fire");
        let err = ToolError::from_io(&other, "x");
        assert!(err.is(ErrorCategory::Unexpected));
        assert!(err.message.contains("disk on fire"));
    }

    #[test]
    fn test_from_sandbox_violation() {
        let err: ToolError = SandboxViolation::new("../etc/passwd", PathBuf::from("/etc/passwd")).into();
        assert!(err.is(ErrorCategory::SandboxViolation));
        assert!(err.message.contains("outside the permitted working directory"));
    }

    #[test]
    fn test_tool_result_model_text() {
        let ok = ToolResult::success("count_lines", "Total lines: 3");
        assert!(ok.is_success());
        assert_eq!(ok.to_model_text(), "Total lines: 3");
        assert_eq!(ok.metadata.bytes, Some(14));

        let failed = ToolResult::failure("delete_file", ToolError::not_a_file("dir"));
        assert!(!failed.is_success());
        assert_eq!(failed.to_model_text(), "Error: \"dir\" is not a regular file");
    }

    #[test]
    fn test_from_outcome() {
        let result = ToolResult::from_outcome("t", Err(ToolError::unknown_tool("nope")));
        assert_eq!(result.error().map(|e| e.category), Some(ErrorCategory::UnknownTool));
    }
}
