// src/web/types.rs
use rocket::serde::Serialize;

use crate::error::ChatError;

#[derive(Serialize)]
#[serde(crate = "rocket::serde", rename_all = "lowercase")]
pub enum ResponseType {
    Data,
    Error,
}

#[derive(Serialize)]
#[serde(crate = "rocket::serde")]
pub struct StandardErrorResponse {
    #[serde(rename = "type")]
    pub response_type: ResponseType,
    pub success: bool,
    pub error: String,
    pub error_code: String,
    pub suggestions: Vec<String>,
}

impl StandardErrorResponse {
    pub fn new(error: String, error_code: String, suggestions: Vec<String>) -> Self {
        Self {
            response_type: ResponseType::Error,
            success: false,
            error,
            error_code,
            suggestions,
        }
    }
}

impl From<&ChatError> for StandardErrorResponse {
    fn from(err: &ChatError) -> Self {
        let error = match err {
            ChatError::InvalidRequest(reason) => reason.clone(),
            other => other.to_string(),
        };
        Self::new(
            error,
            err.code().to_string(),
            vec![
                "Send a JSON body of the form {\"messages\": [{\"role\": \"user\", \"content\": \"...\"}]}".to_string(),
                "Roles must be one of system, user or assistant".to_string(),
            ],
        )
    }
}

#[derive(Serialize)]
#[serde(crate = "rocket::serde")]
pub struct HealthResponse {
    #[serde(rename = "type")]
    pub response_type: ResponseType,
    pub success: bool,
    pub status: String,
    pub message: String,
    pub timestamp: String,
    pub api_key_configured: bool,
    pub strategy: String,
    pub model: String,
}
