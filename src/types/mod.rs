pub mod chat;
pub mod envelope;

pub use chat::{ChatMessage, ChatRequest, ChatResponse, Role};
pub use envelope::{CompletionEnvelope, CompletionRequest, GatewayErrorEnvelope};
