// src/web/handlers/chat_handlers.rs
use rocket::http::Status;
use rocket::serde::json::Json;
use rocket::{Shutdown, State};
use tracing::{debug, warn};

use crate::chat::{ChatExchange, ChatService, ReplySource};
use crate::error::ChatError;
use crate::types::ChatResponse;
use crate::web::types::StandardErrorResponse;

/// Answer one `/api/chat` request.
///
/// The exchange is abandoned, with a fallback reply, when the server shuts down.
/// Rocket 0.5 runs each request in its own task and gives handlers no signal
/// when the client disconnects, so an exchange whose caller has gone away keeps
/// running until the gateway answers or `GATEWAY_TIMEOUT_SECS` elapses.
pub async fn chat_handler(
    body: String,
    service: &State<ChatService>,
    shutdown: Shutdown,
) -> Result<Json<ChatResponse>, (Status, Json<StandardErrorResponse>)> {
    // Dropping the exchange future abandons any in-flight gateway call.
    let result = tokio::select! {
        result = service.handle(&body) => result,
        _ = shutdown => {
            warn!("Server shutting down, abandoning chat exchange");
            Ok(ChatExchange {
                response: service.fallback_reply(),
                source: ReplySource::Fallback(ChatError::Transport(
                    "server shutting down".to_string(),
                )),
            })
        }
    };

    match result {
        Ok(exchange) => {
            debug!("Chat reply source: {:?}", exchange.source);
            Ok(Json(exchange.response))
        }
        Err(e) if e.is_recoverable() => {
            warn!(error_code = e.code(), "Unabsorbed chat failure: {}", e);
            Ok(Json(service.fallback_reply()))
        }
        Err(e) => Err((Status::BadRequest, Json(StandardErrorResponse::from(&e)))),
    }
}
