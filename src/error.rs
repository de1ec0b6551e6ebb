// src/error.rs
//! Failure taxonomy of a chat exchange

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ChatError {
    /// Client-caused; the only kind that reaches the caller.
    #[error("invalid request: {0}")]
    InvalidRequest(String),
    #[error("gateway API key is not configured")]
    Unconfigured,
    #[error("gateway rejected credentials: {message}")]
    Unauthorized { message: String },
    #[error("gateway rate limit reached: {message}")]
    RateLimited { message: String },
    #[error("gateway returned status {status}: {message}")]
    GatewayError { status: u16, message: String },
    #[error("malformed gateway response: {0}")]
    MalformedResponse(String),
    #[error("gateway returned no completion content")]
    EmptyCompletion,
    #[error("transport error: {0}")]
    Transport(String),
}

impl ChatError {
    pub fn code(&self) -> &'static str {
        match self {
            ChatError::InvalidRequest(_) => "INVALID_REQUEST",
            ChatError::Unconfigured => "UNCONFIGURED",
            ChatError::Unauthorized { .. } => "UNAUTHORIZED",
            ChatError::RateLimited { .. } => "RATE_LIMITED",
            ChatError::GatewayError { .. } => "GATEWAY_ERROR",
            ChatError::MalformedResponse(_) => "MALFORMED_RESPONSE",
            ChatError::EmptyCompletion => "EMPTY_COMPLETION",
            ChatError::Transport(_) => "TRANSPORT_ERROR",
        }
    }

    /// Upstream HTTP status, for kinds that came from a gateway status line.
    pub fn status(&self) -> Option<u16> {
        match self {
            ChatError::Unauthorized { .. } => Some(401),
            ChatError::RateLimited { .. } => Some(429),
            ChatError::GatewayError { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Everything except a bad request is absorbed into a fallback reply.
    pub fn is_recoverable(&self) -> bool {
        !matches!(self, ChatError::InvalidRequest(_))
    }

    /// Classify a non-success gateway status.
    pub fn from_status(status: u16, message: String) -> Self {
        match status {
            401 => ChatError::Unauthorized { message },
            429 => ChatError::RateLimited { message },
            _ => ChatError::GatewayError { status, message },
        }
    }
}

impl From<reqwest::Error> for ChatError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            ChatError::Transport(format!("request timed out: {}", err))
        } else {
            ChatError::Transport(err.to_string())
        }
    }
}
