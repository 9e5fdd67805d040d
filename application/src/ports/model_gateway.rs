//! Model gateway port
//!
//! Defines the request/response boundary with the language model. The
//! gateway is stateless from the loop's point of view: every request carries
//! the whole conversation.

use async_trait::async_trait;
use confine_domain::{Conversation, ModelResponse};
use thiserror::Error;

/// Errors that can occur at the model boundary
#[derive(Error, Debug)]
pub enum GatewayError {
    #[error("Rate limit exceeded: {0}")]
    RateLimited(String),

    #[error("HTTP error: {0}")]
    Http(String),

    #[error("API error ({status}): {message}")]
    Api { status: u16, message: String },

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("Missing API key: set {0}")]
    MissingApiKey(String),

    #[error("Request timed out")]
    Timeout,
}

impl GatewayError {
    pub fn is_rate_limited(&self) -> bool {
        matches!(self, GatewayError::RateLimited(_))
    }
}

/// Gateway for model communication
#[async_trait]
pub trait ModelGateway: Send + Sync {
    /// Model identifier, for display and logs
    fn model_name(&self) -> &str;

    /// Send the system prompt, full conversation and tool schemas; get one response
    async fn generate(
        &self,
        system_prompt: &str,
        conversation: &Conversation,
        tools: &[serde_json::Value],
    ) -> Result<ModelResponse, GatewayError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rate_limit_detection() {
        assert!(GatewayError::RateLimited("quota".into()).is_rate_limited());
        assert!(!GatewayError::Timeout.is_rate_limited());
    }

    #[test]
    fn test_api_error_display() {
        let err = GatewayError::Api {
            status: 500,
            message: "boom".into(),
        };
        assert_eq!(err.to_string(), "API error (500): boom");
    }
}
