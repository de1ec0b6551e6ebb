// src/core/gateway_client.rs
//! Outbound client for the LLM gateway's `/chat/completions` endpoint

use anyhow::{Context, Result};
use std::time::Duration;
use tracing::{debug, info};

use crate::core::config_manager::GatewayConfig;
use crate::error::ChatError;
use crate::types::{ChatMessage, CompletionRequest};

const COMPLETIONS_ENDPOINT: &str = "/chat/completions";

/// Gateway reply exactly as received; interpretation is left to the normalizer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawCompletion {
    pub status: u16,
    pub body: String,
}

impl RawCompletion {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

pub struct GatewayClient {
    client: reqwest::Client,
    api_key: Option<String>,
    url: String,
    model: String,
    temperature: f32,
    max_tokens: u32,
    site_url: String,
    site_name: String,
    timeout: Duration,
}

impl GatewayClient {
    pub fn new(config: &GatewayConfig) -> Result<Self> {
        let timeout = Duration::from_secs(config.timeout_seconds);
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self {
            client,
            api_key: config.api_key().map(str::to_string),
            url: format!(
                "{}{}",
                config.base_url.trim_end_matches('/'),
                COMPLETIONS_ENDPOINT
            ),
            model: config.model.clone(),
            temperature: config.temperature,
            max_tokens: config.max_tokens,
            site_url: config.site_url.clone(),
            site_name: config.site_name.clone(),
            timeout,
        })
    }

    pub fn is_configured(&self) -> bool {
        self.api_key.is_some()
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    /// Issue exactly one completion call for an already composed transcript.
    ///
    /// Without an API key this returns `Unconfigured` and never touches the network.
    /// No retries; a deadline overrun surfaces as `Transport`.
    pub async fn send(&self, transcript: &[ChatMessage]) -> Result<RawCompletion, ChatError> {
        let api_key = self.api_key.as_deref().ok_or(ChatError::Unconfigured)?;

        let payload = CompletionRequest {
            model: &self.model,
            messages: transcript,
            temperature: self.temperature,
            max_tokens: self.max_tokens,
        };

        info!(
            "Calling gateway: {} (model {}, {} messages)",
            self.url,
            self.model,
            transcript.len()
        );

        let call = async {
            let response = self
                .client
                .post(&self.url)
                .bearer_auth(api_key)
                .header("Content-Type", "application/json")
                .header("HTTP-Referer", &self.site_url)
                .header("X-Title", &self.site_name)
                .json(&payload)
                .send()
                .await?;

            let status = response.status().as_u16();
            let body = response.text().await?;
            Ok::<_, reqwest::Error>(RawCompletion { status, body })
        };

        // The client timeout covers each phase; this bounds the whole exchange.
        let raw = tokio::time::timeout(self.timeout, call)
            .await
            .map_err(|_| {
                ChatError::Transport(format!(
                    "gateway did not answer within {}s",
                    self.timeout.as_secs()
                ))
            })??;

        debug!("Gateway response status: {}", raw.status);
        Ok(raw)
    }
}
