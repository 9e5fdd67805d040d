//! Machine-readable run transcript.
//!
//! [`JsonlConversationLogger`] implements the
//! [`ConversationLogger`](confine_application::ConversationLogger) port by
//! appending one JSON object per event to a file.

mod jsonl_logger;

pub use jsonl_logger::JsonlConversationLogger;
