// src/chat/validator.rs
//! Inbound transcript validation. Runs before anything touches the network.

use serde_json::Value;

use crate::error::ChatError;
use crate::types::{ChatMessage, Role};

/// Parse and validate a raw `/api/chat` body into an ordered transcript.
///
/// Malformed messages are rejected, never coerced: each element must carry a
/// known `role` and a string `content`.
pub fn validate_transcript(body: &str) -> Result<Vec<ChatMessage>, ChatError> {
    let value: Value = serde_json::from_str(body)
        .map_err(|e| ChatError::InvalidRequest(format!("Body is not valid JSON: {}", e)))?;

    let object = value
        .as_object()
        .ok_or_else(|| ChatError::InvalidRequest("Body must be a JSON object".to_string()))?;

    let messages = match object.get("messages") {
        None => {
            return Err(ChatError::InvalidRequest(
                "Missing messages field".to_string(),
            ))
        }
        Some(Value::Array(items)) => items,
        Some(_) => {
            return Err(ChatError::InvalidRequest(
                "messages must be an array".to_string(),
            ))
        }
    };

    if messages.is_empty() {
        return Err(ChatError::InvalidRequest(
            "messages must not be empty".to_string(),
        ));
    }

    messages
        .iter()
        .enumerate()
        .map(|(index, item)| parse_message(index, item))
        .collect()
}

fn parse_message(index: usize, item: &Value) -> Result<ChatMessage, ChatError> {
    let invalid = |reason: &str| ChatError::InvalidRequest(format!("messages[{}] {}", index, reason));

    let object = item.as_object().ok_or_else(|| invalid("must be an object"))?;

    let role = match object.get("role").and_then(Value::as_str) {
        Some("system") => Role::System,
        Some("user") => Role::User,
        Some("assistant") => Role::Assistant,
        Some(_) => return Err(invalid("has an unknown role")),
        None => return Err(invalid("is missing a string role")),
    };

    let content = object
        .get("content")
        .and_then(Value::as_str)
        .ok_or_else(|| invalid("is missing a string content"))?;

    Ok(ChatMessage::new(role, content))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rejection(body: &str) -> String {
        match validate_transcript(body) {
            Err(ChatError::InvalidRequest(reason)) => reason,
            other => panic!("expected InvalidRequest, got {:?}", other),
        }
    }

    #[test]
    fn test_accepts_ordered_transcript() {
        let transcript = validate_transcript(
            r#"{"messages":[{"role":"user","content":"Hi"},{"role":"assistant","content":"Hello"},{"role":"user","content":"  spaced  "}]}"#,
        )
        .unwrap();
        assert_eq!(transcript.len(), 3);
        assert_eq!(transcript[1], ChatMessage::assistant("Hello"));
        // Content is not trimmed.
        assert_eq!(transcript[2].content, "  spaced  ");
    }

    #[test]
    fn test_missing_or_non_array_messages() {
        assert!(rejection(r#"{}"#).contains("Missing"));
        assert!(rejection(r#"{"messages":"hello"}"#).contains("array"));
        assert!(rejection(r#"{"messages":{"role":"user"}}"#).contains("array"));
        assert!(rejection(r#"{"messages":[]}"#).contains("empty"));
    }

    #[test]
    fn test_non_object_bodies() {
        rejection("not json");
        rejection("[]");
        rejection("null");
    }

    #[test]
    fn test_bad_messages_are_rejected_not_coerced() {
        assert!(rejection(r#"{"messages":[{"role":"robot","content":"x"}]}"#).contains("unknown role"));
        assert!(rejection(r#"{"messages":[{"role":"user","content":42}]}"#).contains("messages[0]"));
        assert!(rejection(
            r#"{"messages":[{"role":"user","content":"ok"},{"content":"no role"}]}"#
        )
        .contains("messages[1]"));
        rejection(r#"{"messages":["just text"]}"#);
    }

    #[test]
    fn test_extra_fields_are_ignored() {
        let transcript = validate_transcript(
            r#"{"conversation_id":"abc","messages":[{"role":"user","content":"Hi","id":3}]}"#,
        )
        .unwrap();
        assert_eq!(transcript, vec![ChatMessage::user("Hi")]);
    }
}
