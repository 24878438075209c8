//! Wire types for the OpenAI-compatible chat endpoint.

use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

/// Chat completion request body.
#[derive(Debug, Clone, Serialize)]
pub struct ChatRequest {
    /// Model name.
    pub model: String,
    /// Conversation messages, system first.
    pub messages: Vec<ChatMessage>,
    /// Structured-output constraint, present only for the analysis call.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub response_format: Option<ResponseFormat>,
}

/// Single chat message.
#[derive(Debug, Clone, Serialize)]
pub struct ChatMessage {
    /// Message role (`system` or `user`).
    pub role: String,
    /// Message content.
    pub content: String,
}

impl ChatMessage {
    /// Build a system message.
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: "system".to_string(),
            content: content.into(),
        }
    }

    /// Build a user message.
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: "user".to_string(),
            content: content.into(),
        }
    }
}

/// Response format constraint.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ResponseFormat {
    /// Constrain output to a named JSON schema.
    JsonSchema { json_schema: JsonSchemaFormat },
}

/// Named JSON schema payload.
#[derive(Debug, Clone, Serialize)]
pub struct JsonSchemaFormat {
    /// Schema name.
    pub name: String,
    /// Whether the model must conform strictly.
    pub strict: bool,
    /// The schema itself.
    pub schema: Value,
}

/// Chat completion response body.
#[derive(Debug, Deserialize)]
pub struct ChatResponse {
    #[serde(default)]
    pub choices: Vec<ChatChoice>,
}

impl ChatResponse {
    /// Content of the first choice, if any.
    pub fn text(&self) -> Option<&str> {
        self.choices
            .first()
            .and_then(|choice| choice.message.content.as_deref())
    }
}

/// Single completion choice.
#[derive(Debug, Deserialize)]
pub struct ChatChoice {
    pub message: ChatResponseMessage,
}

/// Message inside a completion choice.
#[derive(Debug, Deserialize)]
pub struct ChatResponseMessage {
    #[serde(default)]
    pub content: Option<String>,
}

/// Structured payload decoded from the analysis call.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct AnalysisPayload {
    /// Matched principles with one question each, in model order.
    pub analysis: Vec<AnalysisItem>,
}

/// One matched principle in the analysis payload.
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisItem {
    /// Id of the matched principle, echoed from the prompt.
    pub principle_id: String,
    /// Reflection question generated for the principle.
    pub reflection_question: String,
}

/// JSON schema constraining the analysis response.
pub fn analysis_schema() -> Value {
    json!({
        "type": "object",
        "properties": {
            "analysis": {
                "type": "array",
                "items": {
                    "type": "object",
                    "properties": {
                        "principleId": { "type": "string" },
                        "reflectionQuestion": { "type": "string" }
                    },
                    "required": ["principleId", "reflectionQuestion"],
                    "additionalProperties": false
                }
            }
        },
        "required": ["analysis"],
        "additionalProperties": false
    })
}
