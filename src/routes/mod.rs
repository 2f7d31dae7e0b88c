// Route exports
pub mod audio;
pub mod schemes;

use crate::core::SchemeMatcher;
use crate::models::ErrorResponse;
use crate::services::{AudioStorage, VoicePipeline};
use actix_web::{error, http::StatusCode, web, HttpRequest, HttpResponse};
use std::sync::Arc;

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub matcher: SchemeMatcher,
    pub storage: AudioStorage,
    pub pipeline: Arc<VoicePipeline>,
}

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.route("/", web::get().to(welcome))
        .configure(schemes::configure)
        .configure(audio::configure);
}

async fn welcome() -> HttpResponse {
    HttpResponse::Ok().json(serde_json::json!({ "message": "Welcome to Maitri AI API" }))
}

/// JSON error body with the given status
pub(crate) fn error_response(status: StatusCode, error: &str, message: impl ToString) -> HttpResponse {
    HttpResponse::build(status).json(ErrorResponse::new(error, message.to_string(), status.as_u16()))
}

/// JSON error response for payload errors
#[derive(Debug)]
pub struct JsonError(ErrorResponse);

impl std::fmt::Display for JsonError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.0.error, self.0.message)
    }
}

impl std::error::Error for JsonError {}

impl error::ResponseError for JsonError {
    fn status_code(&self) -> StatusCode {
        StatusCode::from_u16(self.0.status_code).unwrap_or(StatusCode::BAD_REQUEST)
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code()).json(&self.0)
    }
}

/// Handle JSON payload errors
pub fn handle_json_payload_error(err: error::JsonPayloadError, req: &HttpRequest) -> actix_web::Error {
    tracing::info!("JSON payload error on {}: {}", req.path(), err);
    JsonError(ErrorResponse::new("invalid_json", format!("Invalid JSON: {}", err), 400)).into()
}

/// Handle query payload errors
pub fn handle_query_payload_error(err: error::QueryPayloadError, _req: &HttpRequest) -> actix_web::Error {
    JsonError(ErrorResponse::new("invalid_query", format!("Invalid query: {}", err), 400)).into()
}
