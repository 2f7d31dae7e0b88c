use actix_web::{http::StatusCode, web, HttpResponse, Responder};
use validator::Validate;
use crate::models::{
    HealthResponse, MatchSchemesRequest, MatchSchemesResponse, SchemeRequest, SchemeResponse,
    SchemesResponse,
};
use crate::routes::{error_response, AppState};

/// Configure catalog and matching routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg
        .route("/health", web::get().to(health_check))
        .route("/schemes", web::get().to(list_schemes))
        .route("/schemes/match", web::post().to(match_schemes))
        .route("/scheme", web::post().to(get_scheme));
}

/// Health check endpoint
async fn health_check(state: web::Data<AppState>) -> impl Responder {
    HttpResponse::Ok().json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        timestamp: chrono::Utc::now(),
        schemes: state.matcher.catalog().len(),
    })
}

/// Full catalog, unfiltered, in catalog order
///
/// GET /schemes
async fn list_schemes(state: web::Data<AppState>) -> impl Responder {
    HttpResponse::Ok().json(SchemesResponse {
        schemes: state.matcher.catalog().all().to_vec(),
    })
}

/// Look up a single scheme
///
/// POST /scheme
///
/// Request body:
/// ```json
/// { "scheme_id": "string" }
/// ```
async fn get_scheme(
    state: web::Data<AppState>,
    req: web::Json<SchemeRequest>,
) -> impl Responder {
    if let Err(errors) = req.validate() {
        return error_response(StatusCode::BAD_REQUEST, "Invalid scheme id", errors);
    }

    match state.matcher.get_by_id(&req.scheme_id) {
        Some(scheme) => HttpResponse::Ok().json(SchemeResponse {
            scheme: scheme.clone(),
        }),
        None => {
            tracing::debug!("Scheme not found: {}", req.scheme_id);
            error_response(
                StatusCode::NOT_FOUND,
                "Scheme not found",
                format!("No scheme with id '{}'", req.scheme_id),
            )
        }
    }
}

/// Match a profile against the catalog
///
/// POST /schemes/match
///
/// Request body:
/// ```json
/// { "user_profile": { "has_aadhaar": true, "income_level": "bpl" } }
/// ```
async fn match_schemes(
    state: web::Data<AppState>,
    req: web::Json<MatchSchemesRequest>,
) -> impl Responder {
    let result = state.matcher.match_profile(&req.user_profile);

    HttpResponse::Ok().json(MatchSchemesResponse {
        schemes: result.to_records(),
        pass: result.pass,
        total_candidates: result.total_candidates,
    })
}
