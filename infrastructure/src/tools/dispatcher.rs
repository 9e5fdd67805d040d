//! Tool dispatcher, the concrete [`ToolExecutorPort`].
//!
//! ```text
//! ToolExecutorPort::execute(root, call)
//!   ├─ lookup(name)            → UnknownTool, nothing else happens
//!   ├─ validate required args  → InvalidArgument
//!   └─ handler.call(root, call) → output or categorized ToolError
//! ```
//!
//! Handlers guard their own path arguments; the dispatcher does not.

use std::time::Instant;

use async_trait::async_trait;
use confine_application::ports::tool_executor::ToolExecutorPort;
use confine_domain::tool::{
    entities::{ToolCall, ToolSpec},
    traits::{DefaultToolValidator, ToolValidator},
    value_objects::{ToolError, ToolResult},
};
use confine_domain::WorkingRoot;
use tracing::{debug, info};

use super::registry::ToolRegistry;

pub struct ToolDispatcher {
    registry: ToolRegistry,
    validator: DefaultToolValidator,
}

impl ToolDispatcher {
    pub fn new(registry: ToolRegistry) -> Self {
        Self {
            registry,
            validator: DefaultToolValidator,
        }
    }

    pub fn registry(&self) -> &ToolRegistry {
        &self.registry
    }

    async fn dispatch(&self, root: &WorkingRoot, call: &ToolCall) -> Result<String, ToolError> {
        let tool = self
            .registry
            .lookup(&call.tool_name)
            .ok_or_else(|| ToolError::unknown_tool(&call.tool_name))?;

        self.validator.validate(call, &tool.definition)?;
        tool.handler.call(root, call).await
    }
}

#[async_trait]
impl ToolExecutorPort for ToolDispatcher {
    fn tool_spec(&self) -> &ToolSpec {
        self.registry.spec()
    }

    async fn execute(&self, root: &WorkingRoot, call: &ToolCall) -> ToolResult {
        let start = Instant::now();
        info!(tool = %call.tool_name, args = %call.format_args(), "Dispatching tool call");

        let outcome = self.dispatch(root, call).await;
        let elapsed_ms = start.elapsed().as_millis() as u64;

        match &outcome {
            Ok(output) => debug!(tool = %call.tool_name, elapsed_ms, bytes = output.len(), "Tool succeeded"),
            Err(e) => info!(tool = %call.tool_name, elapsed_ms, category = %e.category, "Tool failed: {}", e.message),
        }

        ToolResult::from_outcome(&call.tool_name, outcome).with_duration(elapsed_ms)
    }
}
