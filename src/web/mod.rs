// src/web/mod.rs

pub mod handlers;
pub mod types;

pub use types::*;

use crate::chat::ChatService;
use crate::core::ChatConfig;
use crate::types::ChatResponse;
use anyhow::Result;
use rocket::data::{Limits, ToByteUnit};
use rocket::fairing::{Fairing, Info, Kind};
use rocket::http::{Header, Status};
use rocket::serde::json::Json;
use rocket::{catchers, get, options, post, routes, Build, Request, Response, Rocket, Shutdown, State};
use tracing::info;

// CORS Fairing
pub struct Cors;

#[rocket::async_trait]
impl Fairing for Cors {
    fn info(&self) -> Info {
        Info {
            name: "Add CORS headers to responses",
            kind: Kind::Response,
        }
    }

    async fn on_response<'r>(&self, _request: &'r Request<'_>, response: &mut Response<'r>) {
        response.set_header(Header::new("Access-Control-Allow-Origin", "*"));
        response.set_header(Header::new(
            "Access-Control-Allow-Methods",
            "POST, GET, OPTIONS",
        ));
        response.set_header(Header::new("Access-Control-Allow-Headers", "*"));
        response.set_header(Header::new("Access-Control-Allow-Credentials", "true"));
    }
}

#[post("/chat", data = "<body>")]
pub async fn chat(
    body: String,
    service: &State<ChatService>,
    shutdown: Shutdown,
) -> Result<Json<ChatResponse>, (Status, Json<StandardErrorResponse>)> {
    handlers::chat_handler(body, service, shutdown).await
}

#[get("/health")]
pub async fn health(service: &State<ChatService>) -> Json<HealthResponse> {
    handlers::health_handler(service).await
}

// Kept for the older diagnostics page.
#[get("/test")]
pub async fn test_endpoint(service: &State<ChatService>) -> Json<HealthResponse> {
    handlers::health_handler(service).await
}

#[options("/<_..>")]
pub async fn options() -> Status {
    Status::Ok
}

// Error catchers
#[rocket::catch(400)]
pub fn bad_request() -> Json<StandardErrorResponse> {
    Json(StandardErrorResponse::new(
        "Invalid request format".to_string(),
        "BAD_REQUEST".to_string(),
        vec!["Check your request JSON format".to_string()],
    ))
}

#[rocket::catch(404)]
pub fn not_found() -> Json<StandardErrorResponse> {
    Json(StandardErrorResponse::new(
        "Endpoint not found".to_string(),
        "NOT_FOUND".to_string(),
        vec!["Available endpoints: POST /api/chat, GET /api/health".to_string()],
    ))
}

#[rocket::catch(413)]
pub fn payload_too_large() -> Json<StandardErrorResponse> {
    Json(StandardErrorResponse::new(
        "Conversation is too large".to_string(),
        "PAYLOAD_TOO_LARGE".to_string(),
        vec!["Start a new conversation or send fewer previous turns".to_string()],
    ))
}

#[rocket::catch(422)]
pub fn unprocessable() -> Json<StandardErrorResponse> {
    Json(StandardErrorResponse::new(
        "Request body could not be processed".to_string(),
        "UNPROCESSABLE".to_string(),
        vec!["Verify all required fields are present".to_string()],
    ))
}

#[rocket::catch(500)]
pub fn internal_error() -> Json<StandardErrorResponse> {
    Json(StandardErrorResponse::new(
        "Internal server error".to_string(),
        "INTERNAL_ERROR".to_string(),
        vec!["Try again in a few moments".to_string()],
    ))
}

/// Assemble the rocket instance around an already built service.
pub fn build_rocket(service: ChatService, port: u16) -> Rocket<Build> {
    let figment = rocket::Config::figment()
        .merge(("address", "0.0.0.0"))
        .merge(("port", port))
        .merge(("limits", Limits::default().limit("string", 1.mebibytes())));

    rocket::custom(figment)
        .attach(Cors)
        .manage(service)
        .register(
            "/api",
            catchers![
                bad_request,
                not_found,
                payload_too_large,
                unprocessable,
                internal_error
            ],
        )
        .mount("/api", routes![chat, health, test_endpoint, options])
}

// Main server start function
pub async fn start_web_server(config: ChatConfig) -> Result<()> {
    let port = config.port;
    let service = ChatService::new(config)?;

    info!("Starting hiring chat API server");
    info!("Strategy: {}", service.strategy().as_str());
    info!("Gateway configured: {}", service.is_configured());
    info!("Server: http://0.0.0.0:{}", port);

    build_rocket(service, port)
        .launch()
        .await
        .map_err(|e| anyhow::anyhow!("Rocket server failed: {}", e))?;

    Ok(())
}
