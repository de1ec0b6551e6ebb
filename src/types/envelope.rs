// src/types/envelope.rs
use serde::{Deserialize, Serialize};

use crate::types::chat::ChatMessage;

// ===== Outbound gateway types =====

#[derive(Debug, Serialize)]
pub struct CompletionRequest<'a> {
    pub model: &'a str,
    pub messages: &'a [ChatMessage],
    pub temperature: f32,
    pub max_tokens: u32,
}

// ===== Gateway response types =====
// Only `choices[0].message.content` is read; everything else in the envelope is ignored.

#[derive(Debug, Deserialize)]
pub struct CompletionEnvelope {
    pub choices: Vec<CompletionChoice>,
}

#[derive(Debug, Deserialize)]
pub struct CompletionChoice {
    #[serde(default)]
    pub message: Option<CompletionMessage>,
}

#[derive(Debug, Deserialize)]
pub struct CompletionMessage {
    #[serde(default)]
    pub content: Option<String>,
}

impl CompletionEnvelope {
    pub fn first_content(self) -> Option<String> {
        self.choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message)
            .and_then(|message| message.content)
    }
}

/// Error bodies seen from OpenRouter-style gateways:
/// `{"error": {"message": "...", "code": 401}}` or a bare `{"message": "..."}`.
#[derive(Debug, Default, Deserialize)]
pub struct GatewayErrorEnvelope {
    #[serde(default)]
    pub error: Option<GatewayErrorDetail>,
    #[serde(default)]
    pub message: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct GatewayErrorDetail {
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub code: Option<serde_json::Value>,
}

impl GatewayErrorEnvelope {
    pub fn message(&self) -> Option<&str> {
        self.error
            .as_ref()
            .and_then(|detail| detail.message.as_deref())
            .or(self.message.as_deref())
    }

    /// Numeric status carried inside the body, when the gateway reports one.
    pub fn code(&self) -> Option<u16> {
        let code = self.error.as_ref()?.code.as_ref()?;
        match code {
            serde_json::Value::Number(n) => n.as_u64().and_then(|n| u16::try_from(n).ok()),
            serde_json::Value::String(s) => s.parse().ok(),
            _ => None,
        }
    }
}
