// src/lib.rs
//! Hiring assistant chat proxy: one pipeline in front of an LLM gateway

pub mod chat;
pub mod cli;
pub mod core;
pub mod error;
pub mod types;
pub mod web;

pub use crate::chat::{ChatDispatcher, ChatExchange, ChatService, ReplySource};
pub use crate::core::{ChatConfig, ConfigManager, Strategy};
pub use crate::error::ChatError;
pub use crate::types::{ChatMessage, ChatResponse, Role};
pub use crate::web::{build_rocket, start_web_server};
