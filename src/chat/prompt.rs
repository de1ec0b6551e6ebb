// src/chat/prompt.rs
use crate::types::ChatMessage;

pub const DEFAULT_SYSTEM_PROMPT: &str = "You are a helpful hiring assistant for a recruitment platform. \
Help recruiters and candidates with resumes, job descriptions, interview preparation, \
candidate screening and career questions. Keep answers concise and practical. \
If the user asks about something unrelated to hiring or careers, politely redirect \
the conversation back to hiring topics.";

/// Prepend one system message to a copy of `transcript`.
///
/// Not idempotent: calling it twice yields two system messages, so the pipeline
/// calls it exactly once per exchange.
pub fn inject_system_prompt(prompt: &str, transcript: &[ChatMessage]) -> Vec<ChatMessage> {
    let mut composed = Vec::with_capacity(transcript.len() + 1);
    composed.push(ChatMessage::system(prompt));
    composed.extend_from_slice(transcript);
    composed
}
