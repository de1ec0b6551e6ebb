// src/chat/scripted.rs
//! Offline keyword responder: answers without ever calling the gateway

use serde::{Deserialize, Serialize};

use crate::core::config_manager::ScriptedConfig;
use crate::types::{ChatMessage, ChatResponse, Role};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeywordRule {
    pub keyword: String,
    pub reply: String,
}

impl KeywordRule {
    pub fn new(keyword: &str, reply: &str) -> Self {
        Self {
            keyword: keyword.to_string(),
            reply: reply.to_string(),
        }
    }
}

pub const DEFAULT_SCRIPTED_REPLY: &str = "I'm the hiring assistant. I can help with resumes, interviews, job postings, salaries and skills. What would you like to know?";

/// Built-in table, in match priority order.
pub fn default_rules() -> Vec<KeywordRule> {
    vec![
        KeywordRule::new(
            "hello",
            "Hello! I'm your hiring assistant. Ask me about candidates, resumes or interview preparation.",
        ),
        KeywordRule::new(
            "interview",
            "For interviews, prepare a structured set of questions tied to the role's key skills, and score every candidate against the same rubric.",
        ),
        KeywordRule::new(
            "resume",
            "When reviewing a resume, look for measurable achievements, relevant experience and a clear progression. You can browse the resume listings to compare candidates.",
        ),
        KeywordRule::new(
            "salary",
            "Salary ranges depend on role, seniority and location. Benchmarking against similar postings in your market is a good starting point.",
        ),
        KeywordRule::new(
            "job",
            "A strong job posting states the responsibilities, the must-have skills and what makes the team attractive. Keep it concise.",
        ),
        KeywordRule::new(
            "skill",
            "Separate must-have skills from nice-to-haves, and verify the critical ones with a practical exercise or targeted questions.",
        ),
        KeywordRule::new(
            "thank",
            "You're welcome! Let me know if there's anything else I can help with in your hiring process.",
        ),
    ]
}

pub struct ScriptedResponder {
    rules: Vec<KeywordRule>,
    default_reply: String,
}

impl ScriptedResponder {
    pub fn new(rules: Vec<KeywordRule>, default_reply: String) -> Self {
        // Keywords are matched case-insensitively; lower them once.
        let rules = rules
            .into_iter()
            .filter(|rule| !rule.keyword.is_empty())
            .map(|rule| KeywordRule {
                keyword: rule.keyword.to_lowercase(),
                reply: rule.reply,
            })
            .collect();

        Self {
            rules,
            default_reply,
        }
    }

    pub fn from_config(config: &ScriptedConfig) -> Self {
        let rules = if config.rules.is_empty() {
            default_rules()
        } else {
            config.rules.clone()
        };
        let default_reply = config
            .default_reply
            .clone()
            .unwrap_or_else(|| DEFAULT_SCRIPTED_REPLY.to_string());
        Self::new(rules, default_reply)
    }

    /// Reply to the latest user message; first declared matching keyword wins.
    pub fn reply(&self, transcript: &[ChatMessage]) -> ChatResponse {
        let latest = transcript
            .iter()
            .rev()
            .find(|message| message.role == Role::User)
            .map(|message| message.content.to_lowercase());

        let reply = latest
            .and_then(|text| {
                self.rules
                    .iter()
                    .find(|rule| text.contains(&rule.keyword))
                    .map(|rule| rule.reply.clone())
            })
            .unwrap_or_else(|| self.default_reply.clone());

        ChatResponse::assistant(reply)
    }
}

impl Default for ScriptedResponder {
    fn default() -> Self {
        Self::new(default_rules(), DEFAULT_SCRIPTED_REPLY.to_string())
    }
}
