//! Agent execution progress port.
//!
//! [`AgentProgressNotifier`] is an **output port** that the presentation layer
//! implements to show the run to the user as it happens.
//!
//! All methods have default no-op implementations, so implementers only
//! need to override the callbacks they care about.

use confine_domain::{ToolCall, ToolResult};

pub trait AgentProgressNotifier: Send + Sync {
    /// Called before round `iteration` (1-based) is sent to the model
    fn on_iteration_start(&self, _iteration: usize, _max_iterations: usize) {}

    /// Called when the model has answered a round
    fn on_model_response(&self, _iteration: usize, _tool_calls: usize) {}

    /// Called when a tool is about to run
    fn on_tool_call(&self, _call: &ToolCall) {}

    /// Called with the tool's result (success or failure)
    fn on_tool_result(&self, _result: &ToolResult) {}

    /// Called once with the final text answer
    fn on_final_answer(&self, _text: &str) {}
}

/// No-op progress notifier
pub struct NoAgentProgress;

impl AgentProgressNotifier for NoAgentProgress {}
