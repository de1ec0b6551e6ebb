// src/chat/mod.rs
//! Chat proxy pipeline and its client-side dispatcher

pub mod dispatcher;
pub mod fallback;
pub mod normalizer;
pub mod prompt;
pub mod scripted;
pub mod service;
pub mod validator;

pub use dispatcher::{ChatDispatcher, DISPATCH_APOLOGY};
pub use fallback::{FallbackPicker, FallbackResponder, FALLBACK_REPLIES};
pub use normalizer::normalize;
pub use prompt::{inject_system_prompt, DEFAULT_SYSTEM_PROMPT};
pub use scripted::{KeywordRule, ScriptedResponder};
pub use service::{ChatExchange, ChatService, ReplySource};
pub use validator::validate_transcript;
