// src/chat/normalizer.rs
//! Turns a raw gateway reply into a `ChatResponse` or a classified failure

use crate::core::RawCompletion;
use crate::error::ChatError;
use crate::types::{ChatResponse, CompletionEnvelope, GatewayErrorEnvelope};

const MAX_ERROR_TEXT: usize = 300;

/// An empty string in `choices[0].message.content` is a successful, empty reply.
/// Only a missing or null content is `EmptyCompletion`.
pub fn normalize(raw: &RawCompletion) -> Result<ChatResponse, ChatError> {
    if !raw.is_success() {
        return Err(ChatError::from_status(raw.status, error_text(&raw.body)));
    }

    let value: serde_json::Value = serde_json::from_str(&raw.body)
        .map_err(|e| ChatError::MalformedResponse(format!("body is not JSON: {}", e)))?;

    // Some gateways answer 200 with an error envelope instead of choices.
    if value.get("choices").is_none() && value.get("error").is_some() {
        let envelope: GatewayErrorEnvelope = serde_json::from_value(value).unwrap_or_default();
        let message = envelope.message().unwrap_or("unknown gateway error");
        let status = envelope.code().unwrap_or(raw.status);
        let message = truncate(message);
        return Err(if (200..300).contains(&status) {
            ChatError::GatewayError { status, message }
        } else {
            ChatError::from_status(status, message)
        });
    }

    let envelope: CompletionEnvelope = serde_json::from_value(value)
        .map_err(|e| ChatError::MalformedResponse(format!("unexpected envelope: {}", e)))?;

    envelope
        .first_content()
        .map(ChatResponse::assistant)
        .ok_or(ChatError::EmptyCompletion)
}

fn error_text(body: &str) -> String {
    let parsed = serde_json::from_str::<GatewayErrorEnvelope>(body).ok();
    match parsed.as_ref().and_then(GatewayErrorEnvelope::message) {
        Some(message) => truncate(message),
        None if body.trim().is_empty() => "no error body".to_string(),
        None => truncate(body.trim()),
    }
}

fn truncate(text: &str) -> String {
    match text.char_indices().nth(MAX_ERROR_TEXT) {
        Some((cut, _)) => format!("{}...", &text[..cut]),
        None => text.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw(status: u16, body: &str) -> RawCompletion {
        RawCompletion {
            status,
            body: body.to_string(),
        }
    }

    #[test]
    fn test_extracts_first_choice() {
        let response = normalize(&raw(
            200,
            r#"{"id":"gen-1","model":"m","choices":[{"index":0,"message":{"role":"assistant","content":"Hello"},"finish_reason":"stop"},{"message":{"content":"ignored"}}],"usage":{"total_tokens":8}}"#,
        ))
        .unwrap();
        assert_eq!(response, ChatResponse::assistant("Hello"));
    }

    #[test]
    fn test_status_classification_carries_message() {
        assert_eq!(
            normalize(&raw(401, r#"{"error":{"message":"No auth credentials found","code":401}}"#)),
            Err(ChatError::Unauthorized {
                message: "No auth credentials found".to_string()
            })
        );
        assert_eq!(
            normalize(&raw(429, r#"{"message":"slow down"}"#)),
            Err(ChatError::RateLimited {
                message: "slow down".to_string()
            })
        );
        assert_eq!(
            normalize(&raw(502, "Bad Gateway")),
            Err(ChatError::GatewayError {
                status: 502,
                message: "Bad Gateway".to_string()
            })
        );
    }

    #[test]
    fn test_malformed_bodies() {
        assert!(matches!(
            normalize(&raw(200, "<html>oops</html>")),
            Err(ChatError::MalformedResponse(_))
        ));
        assert!(matches!(
            normalize(&raw(200, r#"{"result":"Hello"}"#)),
            Err(ChatError::MalformedResponse(_))
        ));
        assert!(matches!(
            normalize(&raw(200, r#"{"choices":"nope"}"#)),
            Err(ChatError::MalformedResponse(_))
        ));
    }

    #[test]
    fn test_missing_content_is_empty_completion() {
        for body in [
            r#"{"choices":[]}"#,
            r#"{"choices":[{}]}"#,
            r#"{"choices":[{"message":null}]}"#,
            r#"{"choices":[{"message":{"role":"assistant","content":null}}]}"#,
        ] {
            assert_eq!(normalize(&raw(200, body)), Err(ChatError::EmptyCompletion), "{}", body);
        }
    }

    #[test]
    fn test_empty_string_content_is_success() {
        assert_eq!(
            normalize(&raw(200, r#"{"choices":[{"message":{"content":""}}]}"#)),
            Ok(ChatResponse::assistant(""))
        );
    }

    #[test]
    fn test_error_envelope_with_success_status() {
        assert_eq!(
            normalize(&raw(200, r#"{"error":{"message":"Key revoked","code":401}}"#)),
            Err(ChatError::Unauthorized {
                message: "Key revoked".to_string()
            })
        );
        assert!(matches!(
            normalize(&raw(200, r#"{"error":{"message":"upstream hiccup"}}"#)),
            Err(ChatError::GatewayError { status: 200, .. })
        ));
    }

    #[test]
    fn test_long_error_text_truncated() {
        let body = "x".repeat(1000);
        match normalize(&raw(500, &body)) {
            Err(ChatError::GatewayError { message, .. }) => {
                assert_eq!(message.len(), MAX_ERROR_TEXT + 3);
            }
            other => panic!("unexpected {:?}", other),
        }
    }
}
