//! Application layer for confine
//!
//! This crate contains the agent loop use case and the port definitions
//! (interfaces) it drives. It depends only on the domain layer.
//!
//! - [`ports`]: model gateway, tool executor, schema conversion, progress, conversation log
//! - [`use_cases::run_agent`]: the bounded model/tool loop

pub mod config;
pub mod ports;
pub mod use_cases;

pub use config::ExecutionParams;
pub use ports::{
    agent_progress::{AgentProgressNotifier, NoAgentProgress},
    conversation_logger::{ConversationEvent, ConversationLogger, NoConversationLogger},
    model_gateway::{GatewayError, ModelGateway},
    tool_executor::ToolExecutorPort,
    tool_schema::ToolSchemaPort,
};
pub use use_cases::run_agent::{RunAgentError, RunAgentInput, RunAgentOutput, RunAgentUseCase};
