//! Tool domain module
//!
//! Every tool is defined by a [`ToolDefinition`] (name and typed parameters),
//! bound to a [`ToolHandler`], invoked via a [`ToolCall`], and produces a
//! [`ToolResult`].
//!
//! ```text
//! ┌──────────────┐    ┌──────────────┐    ┌──────────────┐
//! │ ToolSpec     │───▶│ ToolCall     │───▶│ ToolResult   │
//! │ (schemas)    │    │ (invocation) │    │ (text/error) │
//! └──────────────┘    └──────────────┘    └──────────────┘
//! ```
//!
//! - **Domain** (this module): definitions, argument accessors, error taxonomy
//! - **Application** (`ToolExecutorPort`): port used by the agent loop
//! - **Infrastructure** (`ToolRegistry`, `ToolDispatcher`): handlers doing I/O

pub mod entities;
pub mod handler;
pub mod traits;
pub mod value_objects;

pub use entities::{ParamType, ToolCall, ToolDefinition, ToolParameter, ToolSpec};
pub use handler::ToolHandler;
pub use traits::{DefaultToolValidator, ToolValidator};
pub use value_objects::{ErrorCategory, ToolError, ToolResult, ToolResultMetadata};
