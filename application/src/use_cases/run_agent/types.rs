//! Type definitions for the RunAgent use case.

use crate::ports::model_gateway::GatewayError;
use confine_domain::{AgentOutcome, Conversation, WorkingRoot};
use thiserror::Error;

/// Model-boundary failures that end a run early.
///
/// Tool failures never show up here; they are fed back to the model.
#[derive(Error, Debug)]
pub enum RunAgentError {
    #[error("Rate limit exceeded: {0}")]
    RateLimited(String),

    #[error("Gateway error: {0}")]
    Gateway(GatewayError),
}

impl From<GatewayError> for RunAgentError {
    fn from(err: GatewayError) -> Self {
        match err {
            GatewayError::RateLimited(message) => RunAgentError::RateLimited(message),
            other => RunAgentError::Gateway(other),
        }
    }
}

impl RunAgentError {
    pub fn is_rate_limited(&self) -> bool {
        matches!(self, RunAgentError::RateLimited(_))
    }
}

/// Input for the RunAgent use case
#[derive(Debug, Clone)]
pub struct RunAgentInput {
    /// The user's request
    pub prompt: String,
    /// Sandbox every tool call of this run is confined to
    pub root: WorkingRoot,
}

impl RunAgentInput {
    pub fn new(prompt: impl Into<String>, root: WorkingRoot) -> Self {
        Self {
            prompt: prompt.into(),
            root,
        }
    }
}

/// Output from the RunAgent use case
#[derive(Debug, Clone)]
pub struct RunAgentOutput {
    pub outcome: AgentOutcome,
    /// Number of model rounds performed
    pub iterations: usize,
    /// The full conversation at the end of the run
    pub conversation: Conversation,
}
