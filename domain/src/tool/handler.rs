//! Uniform callable signature bound to every registered tool

use async_trait::async_trait;

use super::entities::ToolCall;
use super::value_objects::ToolError;
use crate::sandbox::WorkingRoot;

/// Implementation half of a tool descriptor.
///
/// Every handler receives the session's [`WorkingRoot`] explicitly and must
/// route each path argument through the path guard before touching the
/// filesystem or spawning a process. The dispatcher does not re-check paths.
#[async_trait]
pub trait ToolHandler: Send + Sync {
    async fn call(&self, root: &WorkingRoot, call: &ToolCall) -> Result<String, ToolError>;
}
