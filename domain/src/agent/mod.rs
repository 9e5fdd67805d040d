//! Agent domain: the bounded request/response loop as explicit states.

pub mod state;

pub use state::{AgentOutcome, AgentState, Completion, DEFAULT_MAX_ITERATIONS};
