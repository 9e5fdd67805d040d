//! Conversation domain.
//!
//! - [`entities::Conversation`]: ordered user/model turns of one run
//! - [`entities::Message`]: a single turn
//! - [`response::ModelResponse`]: what the model boundary returns

pub mod entities;
pub mod response;

pub use entities::{Conversation, FUNCTION_RESULT_PREFIX, Message, Role};
pub use response::{ContentBlock, ModelResponse};
