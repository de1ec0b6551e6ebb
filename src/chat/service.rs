// src/chat/service.rs
//! The chat proxy pipeline: validate, compose, call, normalize, fall back

use anyhow::Result;
use tracing::{error, info, info_span, warn, Instrument};
use uuid::Uuid;

use crate::chat::fallback::FallbackResponder;
use crate::chat::normalizer::normalize;
use crate::chat::prompt::{inject_system_prompt, DEFAULT_SYSTEM_PROMPT};
use crate::chat::scripted::ScriptedResponder;
use crate::chat::validator::validate_transcript;
use crate::core::{ChatConfig, GatewayClient, Strategy};
use crate::error::ChatError;
use crate::types::{ChatMessage, ChatResponse};

/// Which path produced a reply.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReplySource {
    Gateway,
    Fallback(ChatError),
    Scripted,
}

#[derive(Debug, Clone)]
pub struct ChatExchange {
    pub response: ChatResponse,
    pub source: ReplySource,
}

impl ChatExchange {
    fn fallback(response: ChatResponse, reason: ChatError) -> Self {
        Self {
            response,
            source: ReplySource::Fallback(reason),
        }
    }
}

pub struct ChatService {
    strategy: Strategy,
    system_prompt: String,
    gateway: GatewayClient,
    fallback: FallbackResponder,
    scripted: ScriptedResponder,
}

impl ChatService {
    pub fn new(config: ChatConfig) -> Result<Self> {
        let gateway = GatewayClient::new(&config.gateway)?;

        Ok(Self {
            strategy: config.strategy,
            system_prompt: config
                .system_prompt
                .unwrap_or_else(|| DEFAULT_SYSTEM_PROMPT.to_string()),
            gateway,
            fallback: FallbackResponder::from_config(&config.fallback),
            scripted: ScriptedResponder::from_config(&config.scripted),
        })
    }

    pub fn strategy(&self) -> Strategy {
        self.strategy
    }

    pub fn is_configured(&self) -> bool {
        self.gateway.is_configured()
    }

    pub fn model(&self) -> &str {
        self.gateway.model()
    }

    /// A reply from the canned pool, for exchanges abandoned before completion.
    pub fn fallback_reply(&self) -> ChatResponse {
        self.fallback.respond()
    }

    /// Run one exchange for a raw request body.
    ///
    /// Only `InvalidRequest` is returned as an error; every other failure is
    /// logged and answered from the fallback pool.
    pub async fn handle(&self, body: &str) -> Result<ChatExchange, ChatError> {
        let request_id = Uuid::new_v4();
        let span = info_span!("chat", %request_id, strategy = self.strategy.as_str());

        async {
            let transcript = validate_transcript(body).map_err(|e| {
                warn!("Rejected chat request: {}", e);
                e
            })?;
            Ok::<_, ChatError>(self.respond(&transcript).await)
        }
        .instrument(span)
        .await
    }

    /// Answer an already validated transcript. Never fails.
    pub async fn respond(&self, transcript: &[ChatMessage]) -> ChatExchange {
        match self.strategy {
            Strategy::ScriptedFallback => {
                info!("Answering from keyword table");
                ChatExchange {
                    response: self.scripted.reply(transcript),
                    source: ReplySource::Scripted,
                }
            }
            Strategy::Remote => self.respond_remote(transcript).await,
        }
    }

    async fn respond_remote(&self, transcript: &[ChatMessage]) -> ChatExchange {
        let composed = inject_system_prompt(&self.system_prompt, transcript);

        let outcome = match self.gateway.send(&composed).await {
            Ok(raw) => normalize(&raw),
            Err(e) => Err(e),
        };

        match outcome {
            Ok(response) => {
                info!(
                    "Gateway reply received ({} chars)",
                    response.content.chars().count()
                );
                ChatExchange {
                    response,
                    source: ReplySource::Gateway,
                }
            }
            Err(ChatError::Unconfigured) => {
                info!("Gateway not configured, using fallback reply");
                ChatExchange::fallback(self.fallback.respond(), ChatError::Unconfigured)
            }
            Err(e) => {
                match &e {
                    ChatError::Unauthorized { .. } | ChatError::MalformedResponse(_) => {
                        error!(
                            error_code = e.code(),
                            upstream_status = ?e.status(),
                            "Gateway call failed: {}",
                            e
                        )
                    }
                    _ => warn!(
                        error_code = e.code(),
                        upstream_status = ?e.status(),
                        "Gateway call failed: {}",
                        e
                    ),
                }
                ChatExchange::fallback(self.fallback.respond(), e)
            }
        }
    }
}
