//! Model response types.
//!
//! A response is an ordered list of content blocks mixing text and function
//! call requests, in the order the model emitted them.

use crate::tool::entities::ToolCall;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// A single block of content within a model response.
///
/// # Examples
///
/// ```
/// use confine_domain::session::response::ContentBlock;
///
/// let text = ContentBlock::Text { text: "Let me look at that file.".to_string() };
/// assert!(text.as_text().is_some());
///
/// let call = ContentBlock::FunctionCall {
///     name: "get_file_content".to_string(),
///     args: [("file_path".to_string(), serde_json::json!("main.py"))]
///         .into_iter().collect(),
/// };
/// assert!(call.as_function_call().is_some());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ContentBlock {
    /// A text content block from the model.
    Text { text: String },

    /// A function call request from the model.
    FunctionCall {
        name: String,
        args: HashMap<String, serde_json::Value>,
    },
}

impl ContentBlock {
    pub fn text(text: impl Into<String>) -> Self {
        ContentBlock::Text { text: text.into() }
    }

    pub fn function_call(name: impl Into<String>, args: HashMap<String, serde_json::Value>) -> Self {
        ContentBlock::FunctionCall {
            name: name.into(),
            args,
        }
    }

    /// Returns the text content if this is a `Text` block.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            ContentBlock::Text { text } => Some(text),
            _ => None,
        }
    }

    /// Returns `(name, args)` if this is a `FunctionCall` block.
    pub fn as_function_call(&self) -> Option<(&str, &HashMap<String, serde_json::Value>)> {
        match self {
            ContentBlock::FunctionCall { name, args } => Some((name, args)),
            _ => None,
        }
    }
}

/// A structured response from the model boundary.
///
/// - [`text_content()`](Self::text_content): concatenated text blocks
/// - [`tool_calls()`](Self::tool_calls): function call blocks as `Vec<ToolCall>`, in order
/// - [`is_final_answer()`](Self::is_final_answer): text and no function calls
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ModelResponse {
    pub content: Vec<ContentBlock>,
}

impl ModelResponse {
    pub fn new(content: Vec<ContentBlock>) -> Self {
        Self { content }
    }

    pub fn from_text(text: impl Into<String>) -> Self {
        Self {
            content: vec![ContentBlock::text(text)],
        }
    }

    pub fn empty() -> Self {
        Self::default()
    }

    pub fn text_content(&self) -> String {
        self.content
            .iter()
            .filter_map(|b| b.as_text())
            .collect::<Vec<_>>()
            .join("")
    }

    pub fn tool_calls(&self) -> Vec<ToolCall> {
        self.content
            .iter()
            .filter_map(|b| b.as_function_call())
            .map(|(name, args)| ToolCall::new(name).with_arguments(args.clone()))
            .collect()
    }

    pub fn has_tool_calls(&self) -> bool {
        self.content.iter().any(|b| b.as_function_call().is_some())
    }

    pub fn has_text(&self) -> bool {
        !self.text_content().trim().is_empty()
    }

    /// A text-only response ends the run. Text alongside function calls is
    /// commentary and the calls still run.
    pub fn is_final_answer(&self) -> bool {
        self.has_text() && !self.has_tool_calls()
    }

    /// Textual rendering stored as the model turn in the conversation
    pub fn render_for_history(&self) -> String {
        self.content
            .iter()
            .map(|block| match block {
                ContentBlock::Text { text } => text.clone(),
                ContentBlock::FunctionCall { name, args } => {
                    let call = ToolCall::new(name.as_str()).with_arguments(args.clone());
                    format!("function_call: {}({})", name, call.format_args())
                }
            })
            .collect::<Vec<_>>()
            .join("\n")
    }
}
