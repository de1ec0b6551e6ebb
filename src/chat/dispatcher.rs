// src/chat/dispatcher.rs
//! Client side of `/api/chat`: sends the transcript, always yields displayable text

use anyhow::{Context, Result};
use std::time::Duration;
use tracing::warn;

use crate::types::{ChatMessage, ChatRequest, ChatResponse};

pub const DISPATCH_APOLOGY: &str =
    "Sorry, I'm having trouble connecting right now. Please try again in a moment.";

pub struct ChatDispatcher {
    client: reqwest::Client,
    endpoint: String,
}

impl ChatDispatcher {
    pub fn new(endpoint: impl Into<String>, timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self {
            client,
            endpoint: endpoint.into(),
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Send the whole transcript, prior turns included.
    ///
    /// Never errors: any failure, or a blank reply, becomes `DISPATCH_APOLOGY`.
    pub async fn send(&self, transcript: &[ChatMessage]) -> String {
        match self.try_send(transcript).await {
            Ok(content) if !content.trim().is_empty() => content,
            Ok(_) => {
                warn!("Chat server returned an empty reply");
                DISPATCH_APOLOGY.to_string()
            }
            Err(e) => {
                warn!("Chat request failed: {:#}", e);
                DISPATCH_APOLOGY.to_string()
            }
        }
    }

    async fn try_send(&self, transcript: &[ChatMessage]) -> Result<String> {
        let request = ChatRequest {
            messages: transcript.to_vec(),
        };

        let response = self
            .client
            .post(&self.endpoint)
            .json(&request)
            .send()
            .await
            .with_context(|| format!("Failed to POST to {}", self.endpoint))?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            anyhow::bail!("HTTP {} error: {}", status, error_text);
        }

        let reply: ChatResponse = response
            .json()
            .await
            .context("Failed to parse chat response")?;
        Ok(reply.content)
    }
}
