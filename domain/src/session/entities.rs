//! Session domain entities

use serde::{Deserialize, Serialize};

/// Prefix of the user turn that carries a tool result back to the model
pub const FUNCTION_RESULT_PREFIX: &str = "Function result: ";

/// Role of a turn in a conversation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Model,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::User => "user",
            Role::Model => "model",
        }
    }
}

/// A turn in a conversation (Entity)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub role: Role,
    pub content: String,
}

impl Message {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }

    pub fn model(content: impl Into<String>) -> Self {
        Self {
            role: Role::Model,
            content: content.into(),
        }
    }

    /// User turn feeding a tool result back to the model
    pub fn function_result(result: &str) -> Self {
        Self::user(format!("{}{}", FUNCTION_RESULT_PREFIX, result))
    }

    pub fn is_function_result(&self) -> bool {
        self.role == Role::User && self.content.starts_with(FUNCTION_RESULT_PREFIX)
    }
}

/// Ordered turns of one agent run.
///
/// Seeded with the user's prompt and only ever appended to; it is owned by a
/// single run and discarded with it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Conversation {
    messages: Vec<Message>,
}

impl Conversation {
    /// Start a conversation with the user's prompt as the only turn
    pub fn seeded(prompt: impl Into<String>) -> Self {
        Self {
            messages: vec![Message::user(prompt)],
        }
    }

    pub fn push(&mut self, message: Message) {
        self.messages.push(message);
    }

    pub fn push_function_result(&mut self, result: &str) {
        self.messages.push(Message::function_result(result));
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    pub fn prompt(&self) -> Option<&str> {
        self.messages.first().map(|m| m.content.as_str())
    }

    pub fn function_result_count(&self) -> usize {
        self.messages.iter().filter(|m| m.is_function_result()).count()
    }
}
