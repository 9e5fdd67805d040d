//! Use cases (application services)

pub mod run_agent;

pub use run_agent::{RunAgentError, RunAgentInput, RunAgentOutput, RunAgentUseCase};
