//! Domain layer for confine
//!
//! Pure types for a sandboxed tool-execution runtime: tool definitions and
//! calls, the error taxonomy every tool result is expressed in, the working
//! root trust boundary, conversations, and the agent loop state machine.
//! Nothing here talks to the network or spawns processes.
//!
//! # Core Concepts
//!
//! ## Working root
//!
//! Every filesystem or process operation a tool performs must resolve inside
//! one directory, the [`WorkingRoot`]. It is an explicit value passed to each
//! tool call, so several roots can coexist (and be tested) in one process.
//!
//! ## Tools
//!
//! A tool is a [`ToolDefinition`] (schema) bound to a [`ToolHandler`]
//! (implementation). A tool call always yields a [`ToolResult`]; failures
//! are [`ToolError`] values categorized by [`ErrorCategory`], never panics.
//!
//! ## Agent loop
//!
//! [`AgentState`] models the bounded model/tool rounds as explicit states.

pub mod agent;
pub mod analysis;
pub mod prompt;
pub mod sandbox;
pub mod session;
pub mod tool;

// Re-export commonly used types
pub use agent::{AgentOutcome, AgentState, Completion, DEFAULT_MAX_ITERATIONS};
pub use analysis::{DuplicateBlock, DuplicateReport, find_duplicates};
pub use prompt::AgentPromptTemplate;
pub use sandbox::{RootError, SandboxViolation, WorkingRoot, normalize_lexically};
pub use session::{ContentBlock, Conversation, Message, ModelResponse, Role};
pub use tool::{
    DefaultToolValidator, ErrorCategory, ParamType, ToolCall, ToolDefinition, ToolError,
    ToolHandler, ToolParameter, ToolResult, ToolSpec, ToolValidator,
};
