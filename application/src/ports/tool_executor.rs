//! Tool Executor port
//!
//! Defines the interface the agent loop uses to run tool calls.

use async_trait::async_trait;
use confine_domain::WorkingRoot;
use confine_domain::tool::{
    entities::{ToolCall, ToolDefinition, ToolSpec},
    value_objects::ToolResult,
};

/// Port for tool execution
///
/// `execute` never fails: unknown tools, bad arguments and tool failures all
/// come back as a failed [`ToolResult`].
#[async_trait]
pub trait ToolExecutorPort: Send + Sync {
    /// Get the specification of all available tools
    fn tool_spec(&self) -> &ToolSpec;

    fn has_tool(&self, name: &str) -> bool {
        self.tool_spec().contains(name)
    }

    fn get_tool(&self, name: &str) -> Option<&ToolDefinition> {
        self.tool_spec().get(name)
    }

    /// Names of all available tools, sorted
    fn available_tools(&self) -> Vec<&str> {
        self.tool_spec().names()
    }

    /// Execute one tool call against `root`
    async fn execute(&self, root: &WorkingRoot, call: &ToolCall) -> ToolResult;
}
