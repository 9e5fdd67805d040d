//! Agent loop state machine.
//!
//! ```text
//!               begin_round (i < max)            response: text only
//!  Running(i) ─────────────────────▶ AwaitingModel(i) ──────────────────▶ Done(Answer)
//!      ▲                                   │        response: nothing
//!      │      response: function calls     │ ─────────────────────────▶ Done(NothingToDo)
//!      └───────────── Running(i+1) ◀───────┘
//!
//!  Running(max) ── begin_round ──▶ Exhausted
//! ```
//!
//! The transitions are pure; the use case performs the model request and the
//! tool calls between them.

use serde::{Deserialize, Serialize};

use crate::session::response::ModelResponse;

/// Default number of model rounds before giving up
pub const DEFAULT_MAX_ITERATIONS: usize = 5;

/// How a `Done` run finished
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Completion {
    /// The model returned a text-only answer
    Answer(String),
    /// The model returned neither text nor function calls
    NothingToDo,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AgentState {
    /// Ready to start round `i` (0-based count of completed rounds)
    Running(usize),
    /// Request for round `i` is in flight
    AwaitingModel(usize),
    Done(Completion),
    Exhausted,
}

impl AgentState {
    pub fn start() -> Self {
        AgentState::Running(0)
    }

    /// `Running(i)` moves to `AwaitingModel(i)`, or to `Exhausted` once
    /// `max_iterations` rounds have completed. Other states are unchanged.
    pub fn begin_round(self, max_iterations: usize) -> Self {
        match self {
            AgentState::Running(i) if i >= max_iterations => AgentState::Exhausted,
            AgentState::Running(i) => AgentState::AwaitingModel(i),
            other => other,
        }
    }

    /// Transition on a model response. A response with function calls
    /// returns `Running(i + 1)`; the caller runs the calls before continuing.
    pub fn on_response(self, response: &ModelResponse) -> Self {
        match self {
            AgentState::AwaitingModel(i) => {
                if response.is_final_answer() {
                    AgentState::Done(Completion::Answer(response.text_content()))
                } else if response.has_tool_calls() {
                    AgentState::Running(i + 1)
                } else {
                    AgentState::Done(Completion::NothingToDo)
                }
            }
            other => other,
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, AgentState::Done(_) | AgentState::Exhausted)
    }

    /// Final outcome once the state is terminal
    pub fn outcome(&self) -> Option<AgentOutcome> {
        match self {
            AgentState::Done(Completion::Answer(text)) => Some(AgentOutcome::Completed(text.clone())),
            AgentState::Done(Completion::NothingToDo) => Some(AgentOutcome::NothingToDo),
            AgentState::Exhausted => Some(AgentOutcome::Exhausted),
            _ => None,
        }
    }
}

/// Result of a whole run as reported to the caller
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum AgentOutcome {
    Completed(String),
    NothingToDo,
    /// Round budget used up without a final answer
    Exhausted,
}

impl AgentOutcome {
    pub fn is_complete(&self) -> bool {
        !matches!(self, AgentOutcome::Exhausted)
    }
}
