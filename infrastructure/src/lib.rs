//! Infrastructure layer for confine
//!
//! Adapters behind the application ports, plus the sandbox and process
//! plumbing every tool is built on:
//!
//! - [`sandbox`]: resolve model-supplied paths inside the working root
//! - [`process`]: run external programs with a timeout and capped output
//! - [`tools`]: the built-in tools, their registry and dispatcher
//! - [`providers`]: the Gemini model gateway
//! - [`config`]: layered TOML configuration
//! - [`logging`]: JSONL conversation transcript

pub mod config;
pub mod logging;
pub mod process;
pub mod providers;
pub mod sandbox;
pub mod tools;

// Re-export commonly used types
pub use config::{ConfigLoader, ConfigValidationError, FileConfig};
pub use logging::JsonlConversationLogger;
pub use process::{ProcessError, ProcessOutput, ProcessSpec, SubprocessRunner};
pub use providers::GeminiGateway;
pub use sandbox::PathGuard;
pub use tools::{
    JsonSchemaToolConverter, RegistryError, ToolDispatcher, ToolRegistry, ToolSettings,
    default_registry,
};
