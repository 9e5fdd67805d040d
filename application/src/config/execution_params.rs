//! Execution parameters for the agent loop.
//!
//! [`ExecutionParams`] groups the static parameters that control
//! [`RunAgentUseCase`](crate::use_cases::run_agent::RunAgentUseCase).
//! Tool-level limits (timeouts, read caps) belong to the tool adapters.

use confine_domain::DEFAULT_MAX_ITERATIONS;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExecutionParams {
    /// Maximum number of model rounds before the run is reported exhausted.
    pub max_iterations: usize,
}

impl Default for ExecutionParams {
    fn default() -> Self {
        Self {
            max_iterations: DEFAULT_MAX_ITERATIONS,
        }
    }
}

impl ExecutionParams {
    pub fn with_max_iterations(mut self, max: usize) -> Self {
        self.max_iterations = max;
        self
    }
}
