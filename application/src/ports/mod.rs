//! Ports (interfaces) for external dependencies
//!
//! These traits define how the application layer interacts with the outside
//! world. Implementations (adapters) live in the infrastructure layer, or in
//! the presentation layer for user-facing output.

pub mod agent_progress;
pub mod conversation_logger;
pub mod model_gateway;
pub mod tool_executor;
pub mod tool_schema;
