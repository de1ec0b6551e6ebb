// src/web/handlers/system_handlers.rs
use rocket::serde::json::Json;
use rocket::State;
use tracing::info;

use crate::chat::ChatService;
use crate::web::types::{HealthResponse, ResponseType};

pub async fn health_handler(service: &State<ChatService>) -> Json<HealthResponse> {
    let configured = service.is_configured();
    info!("Health check (api_key_configured: {})", configured);

    let message = if configured {
        "Chat service is running"
    } else {
        "Chat service is running without a gateway API key, replies come from fallbacks"
    };

    Json(HealthResponse {
        response_type: ResponseType::Data,
        success: true,
        status: "ok".to_string(),
        message: message.to_string(),
        timestamp: chrono::Utc::now().to_rfc3339(),
        api_key_configured: configured,
        strategy: service.strategy().as_str().to_string(),
        model: service.model().to_string(),
    })
}
