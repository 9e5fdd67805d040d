//! Google Gemini gateway.
//!
//! Implements [`ModelGateway`](confine_application::ModelGateway) against the
//! `generateContent` endpoint of the Generative Language API, with native
//! function calling.

mod gateway;
mod types;

pub use gateway::{API_KEY_ENV, DEFAULT_MODEL, GeminiGateway, REQUEST_TIMEOUT};
