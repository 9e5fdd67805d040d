//! [`GeminiGateway`]: the `ModelGateway` adapter for Gemini.

use std::collections::HashMap;
use std::time::Duration;

use async_trait::async_trait;
use confine_application::ports::model_gateway::{GatewayError, ModelGateway};
use confine_domain::{ContentBlock, Conversation, ModelResponse, Role};
use reqwest::{Client, StatusCode};
use tracing::{debug, warn};

use super::types::{
    GeminiContent, GeminiFunctionDeclaration, GeminiGenerationConfig, GeminiPart, GeminiRequest,
    GeminiResponse, GeminiTool,
};

/// Environment variable holding the API key
pub const API_KEY_ENV: &str = "GEMINI_API_KEY";

pub const DEFAULT_MODEL: &str = "gemini-2.0-flash-001";

/// Client-side timeout for one generateContent call
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(120);

const API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta";

#[derive(Clone)]
pub struct GeminiGateway {
    client: Client,
    api_key: String,
    model: String,
    base_url: String,
}

impl std::fmt::Debug for GeminiGateway {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GeminiGateway")
            .field("model", &self.model)
            .field("base_url", &self.base_url)
            .finish_non_exhaustive()
    }
}

impl GeminiGateway {
    pub fn new(api_key: impl Into<String>, model: impl Into<String>) -> Result<Self, GatewayError> {
        let client = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| GatewayError::Http(e.to_string()))?;
        Ok(Self {
            client,
            api_key: api_key.into(),
            model: model.into(),
            base_url: API_BASE.to_string(),
        })
    }

    /// Build from `GEMINI_API_KEY`
    pub fn from_env(model: impl Into<String>) -> Result<Self, GatewayError> {
        let api_key = std::env::var(API_KEY_ENV)
            .ok()
            .filter(|k| !k.trim().is_empty())
            .ok_or_else(|| GatewayError::MissingApiKey(API_KEY_ENV.to_string()))?;
        Self::new(api_key, model)
    }

    /// Point at a different API root (proxies, tests)
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    fn api_url(&self) -> String {
        format!(
            "{}/models/{}:generateContent?key={}",
            self.base_url.trim_end_matches('/'),
            self.model,
            self.api_key
        )
    }
}

/// Conversation turns as Gemini contents; roles map one to one
fn build_contents(conversation: &Conversation) -> Vec<GeminiContent> {
    conversation
        .messages()
        .iter()
        .map(|message| GeminiContent {
            role: Some(
                match message.role {
                    Role::User => "user",
                    Role::Model => "model",
                }
                .to_string(),
            ),
            parts: vec![GeminiPart::Text {
                text: message.content.clone(),
            }],
        })
        .collect()
}

/// Tool schemas as a single `functionDeclarations` group
fn build_tools(tools: &[serde_json::Value]) -> Option<Vec<GeminiTool>> {
    if tools.is_empty() {
        return None;
    }
    let declarations = tools
        .iter()
        .filter_map(|schema| {
            let name = schema.get("name")?.as_str()?.to_string();
            let description = schema
                .get("description")
                .and_then(|d| d.as_str())
                .unwrap_or_default()
                .to_string();
            let parameters = schema.get("parameters").cloned().map(strip_empty_required);
            Some(GeminiFunctionDeclaration {
                name,
                description,
                parameters,
            })
        })
        .collect();
    Some(vec![GeminiTool {
        function_declarations: declarations,
    }])
}

/// Gemini rejects `"required": []`, so drop it
fn strip_empty_required(mut parameters: serde_json::Value) -> serde_json::Value {
    if let Some(obj) = parameters.as_object_mut() {
        if obj
            .get("required")
            .and_then(|r| r.as_array())
            .is_some_and(|r| r.is_empty())
        {
            obj.remove("required");
        }
    }
    parameters
}

fn build_request(
    system_prompt: &str,
    conversation: &Conversation,
    tools: &[serde_json::Value],
) -> GeminiRequest {
    GeminiRequest {
        contents: build_contents(conversation),
        system_instruction: (!system_prompt.is_empty()).then(|| GeminiContent {
            role: None,
            parts: vec![GeminiPart::Text {
                text: system_prompt.to_string(),
            }],
        }),
        tools: build_tools(tools),
        generation_config: GeminiGenerationConfig::default(),
    }
}

/// First candidate's parts as domain content blocks. No candidate (e.g. a
/// blocked prompt) is an empty response, not an error.
fn parse_response(response: GeminiResponse) -> ModelResponse {
    let Some(candidate) = response.candidates.and_then(|c| c.into_iter().next()) else {
        debug!("Gemini returned no candidates");
        return ModelResponse::empty();
    };

    if let Some(reason) = candidate.finish_reason.as_deref() {
        debug!(finish_reason = reason, "Gemini candidate finished");
    }

    let parts = candidate.content.map(|c| c.parts).unwrap_or_default();
    let content = parts
        .into_iter()
        .filter_map(|part| match part {
            GeminiPart::Text { text } => Some(ContentBlock::text(text)),
            GeminiPart::FunctionCall { function_call } => {
                let args: HashMap<String, serde_json::Value> = match function_call.args {
                    serde_json::Value::Object(map) => map.into_iter().collect(),
                    _ => HashMap::new(),
                };
                Some(ContentBlock::function_call(function_call.name, args))
            }
            GeminiPart::Other(_) => None,
        })
        .collect();

    ModelResponse::new(content)
}

/// Classify a non-success HTTP response
fn classify_error(status: StatusCode, body: &str) -> GatewayError {
    if status == StatusCode::TOO_MANY_REQUESTS || body.contains("RESOURCE_EXHAUSTED") {
        return GatewayError::RateLimited(extract_error_message(body));
    }
    GatewayError::Api {
        status: status.as_u16(),
        message: extract_error_message(body),
    }
}

/// `error.message` from a Google API error body, or the raw body
fn extract_error_message(body: &str) -> String {
    serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|v| v.get("error")?.get("message")?.as_str().map(str::to_string))
        .unwrap_or_else(|| body.trim().to_string())
}

#[async_trait]
impl ModelGateway for GeminiGateway {
    fn model_name(&self) -> &str {
        &self.model
    }

    async fn generate(
        &self,
        system_prompt: &str,
        conversation: &Conversation,
        tools: &[serde_json::Value],
    ) -> Result<ModelResponse, GatewayError> {
        let request = build_request(system_prompt, conversation, tools);
        debug!(
            model = %self.model,
            turns = request.contents.len(),
            tools = tools.len(),
            "Sending Gemini request"
        );

        let response = self
            .client
            .post(self.api_url())
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    GatewayError::Timeout
                } else {
                    GatewayError::Http(e.without_url().to_string())
                }
            })?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| GatewayError::Http(e.without_url().to_string()))?;

        if !status.is_success() {
            let err = classify_error(status, &body);
            warn!(status = status.as_u16(), "Gemini request failed: {}", err);
            return Err(err);
        }

        let parsed: GeminiResponse = serde_json::from_str(&body)
            .map_err(|e| GatewayError::InvalidResponse(format!("{}: {}", e, body)))?;
        Ok(parse_response(parsed))
    }
}
