//! Tool Registry
//!
//! The [`ToolRegistry`] binds each tool name to its [`ToolDefinition`] and a
//! [`ToolHandler`]. It is assembled once at startup through
//! [`ToolRegistryBuilder`] and has no mutation API afterwards.
//!
//! # Usage
//!
//! ```ignore
//! use confine_infrastructure::tools::{ToolRegistry, file};
//!
//! let registry = ToolRegistry::builder()
//!     .register(file::write_file_definition(), file::WriteFile)
//!     .build()?;
//!
//! assert!(registry.lookup("write_file").is_some());
//! ```

use std::collections::HashMap;
use std::sync::Arc;

use confine_domain::tool::{
    entities::{ToolDefinition, ToolSpec},
    handler::ToolHandler,
};
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RegistryError {
    #[error("Tool '{0}' is registered more than once")]
    DuplicateTool(String),
}

/// A registered tool: schema plus implementation
#[derive(Clone)]
pub struct RegisteredTool {
    pub definition: ToolDefinition,
    pub handler: Arc<dyn ToolHandler>,
}

impl std::fmt::Debug for RegisteredTool {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RegisteredTool")
            .field("definition", &self.definition)
            .finish_non_exhaustive()
    }
}

/// Closed set of tools available to the agent
#[derive(Debug)]
pub struct ToolRegistry {
    tools: HashMap<String, RegisteredTool>,
    /// Definitions only, for advertising to the model
    spec: ToolSpec,
}

impl ToolRegistry {
    pub fn builder() -> ToolRegistryBuilder {
        ToolRegistryBuilder::default()
    }

    /// All definitions, sorted by name
    pub fn describe(&self) -> Vec<&ToolDefinition> {
        self.spec.sorted()
    }

    pub fn lookup(&self, name: &str) -> Option<&RegisteredTool> {
        self.tools.get(name)
    }

    pub fn spec(&self) -> &ToolSpec {
        &self.spec
    }

    pub fn len(&self) -> usize {
        self.tools.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }
}

/// Startup-time builder; the only way to add tools
#[derive(Default)]
pub struct ToolRegistryBuilder {
    tools: Vec<RegisteredTool>,
}

impl ToolRegistryBuilder {
    pub fn register<H: ToolHandler + 'static>(mut self, definition: ToolDefinition, handler: H) -> Self {
        self.tools.push(RegisteredTool {
            definition,
            handler: Arc::new(handler),
        });
        self
    }

    pub fn build(self) -> Result<ToolRegistry, RegistryError> {
        let mut tools = HashMap::with_capacity(self.tools.len());
        let mut spec = ToolSpec::new();

        for tool in self.tools {
            let name = tool.definition.name.clone();
            if tools.contains_key(&name) {
                return Err(RegistryError::DuplicateTool(name));
            }
            tracing::debug!(tool = %name, "Registered tool");
            spec = spec.register(tool.definition.clone());
            tools.insert(name, tool);
        }

        Ok(ToolRegistry { tools, spec })
    }
}
