use actix_cors::Cors;
use actix_web::{middleware, web, App, HttpServer};
use maitri_ai::config::{AssistantProvider, Settings};
use maitri_ai::core::{FallbackRule, SchemeCatalog, SchemeMatcher};
use maitri_ai::routes::{self, handle_json_payload_error, handle_query_payload_error, AppState};
use maitri_ai::services::{
    Assistant, AudioStorage, GeminiAssistant, KeywordAssistant, PlaceholderSynthesizer,
    PlaceholderTranscriber, VoicePipeline,
};
use std::sync::Arc;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

fn init_logging(settings: &Settings) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&settings.logging.level));

    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_level(true);

    if settings.logging.format == "pretty" {
        subscriber.pretty().init();
    } else {
        subscriber.init();
    }
}

fn load_catalog(settings: &Settings) -> std::io::Result<SchemeCatalog> {
    let catalog = match &settings.catalog.path {
        Some(path) => {
            info!("Loading scheme catalog from {}", path);
            SchemeCatalog::load(path)
        }
        None => SchemeCatalog::builtin(),
    };

    catalog.map_err(|e| {
        error!("Failed to load scheme catalog: {}", e);
        std::io::Error::new(std::io::ErrorKind::InvalidData, e.to_string())
    })
}

fn build_assistant(settings: &Settings) -> Arc<dyn Assistant> {
    let assistant = &settings.assistant;
    match (assistant.provider, &assistant.gemini_api_key) {
        (AssistantProvider::Gemini, Some(api_key)) => match GeminiAssistant::new(
            assistant.gemini_endpoint.clone(),
            api_key.clone(),
            assistant.gemini_model.clone(),
            assistant.timeout_secs,
        ) {
            Ok(gemini) => {
                info!("Using Gemini assistant (model: {})", assistant.gemini_model);
                Arc::new(gemini)
            }
            Err(e) => {
                error!("Failed to create Gemini client ({}), using keyword assistant", e);
                Arc::new(KeywordAssistant::new())
            }
        },
        (AssistantProvider::Gemini, None) => {
            warn!("Gemini assistant selected but GEMINI_API_KEY is not set, using keyword assistant");
            Arc::new(KeywordAssistant::new())
        }
        (AssistantProvider::Keyword, _) => Arc::new(KeywordAssistant::new()),
    }
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    // Load .env file if present
    dotenv::dotenv().ok();

    let settings = Settings::load().map_err(|e| {
        eprintln!("Configuration error: {}", e);
        std::io::Error::new(std::io::ErrorKind::InvalidInput, e.to_string())
    })?;

    init_logging(&settings);
    info!("Starting Maitri AI service...");

    let catalog = Arc::new(load_catalog(&settings)?);
    info!("Scheme catalog loaded ({} schemes)", catalog.len());

    let fallback = FallbackRule::new(
        settings.matching.identity_field.clone(),
        settings.matching.identity_documents.clone(),
    );
    let matcher = SchemeMatcher::new(catalog, fallback, settings.matching.max_results);

    info!(
        "Matcher initialized (max results: {}, fallback: {:?})",
        matcher.max_results(),
        matcher.fallback_rule()
    );

    let storage = AudioStorage::new(
        &settings.storage.upload_dir,
        &settings.storage.audio_dir,
        settings.storage.max_upload_bytes,
    );
    storage.ensure_dirs().await.map_err(|e| {
        error!("Failed to create audio directories: {}", e);
        std::io::Error::new(std::io::ErrorKind::Other, e.to_string())
    })?;

    let pipeline = Arc::new(VoicePipeline::new(
        Arc::new(PlaceholderTranscriber::new()),
        build_assistant(&settings),
        Arc::new(PlaceholderSynthesizer::new()),
        matcher.clone(),
        storage.clone(),
    ));

    // Build application state
    let app_state = AppState {
        matcher,
        storage,
        pipeline,
    };

    // Configure HTTP server
    let host = settings.server.host.clone();
    let port = settings.server.port;
    let workers = settings.server.workers.unwrap_or(4);

    info!("Starting HTTP server on {}:{}", host, port);

    HttpServer::new(move || {
        let cors = Cors::permissive();

        App::new()
            .app_data(web::Data::new(app_state.clone()))
            .app_data(web::JsonConfig::default().error_handler(handle_json_payload_error))
            .app_data(web::QueryConfig::default().error_handler(handle_query_payload_error))
            .wrap(cors)
            .wrap(middleware::Logger::default())
            .wrap(middleware::Compress::default())
            .configure(routes::configure_routes)
    })
    .workers(workers)
    .bind((host, port))?
    .run()
    .await
}
