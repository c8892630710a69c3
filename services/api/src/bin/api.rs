//! services/api/src/bin/api.rs

use api_lib::{
    adapters::{speech_adapter, FsAudioStore, GeminiTextAdapter},
    config::Config,
    error::ApiError,
    web::{self, rest::ApiDoc, AppState, OutputMode},
};
use axum::{
    extract::DefaultBodyLimit,
    http::{header::CONTENT_TYPE, HeaderValue, Method},
    Router,
};
use persona_voice_core::{Orchestrator, ResponseMode};
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

#[tokio::main]
async fn main() -> Result<(), ApiError> {
    // --- 1. Load Configuration & Set Up Logging ---
    let config = Config::from_env()?;
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(config.log_level.to_string()))
        .with(tracing_subscriber::fmt::layer())
        .init();
    info!("Configuration loaded. Starting server...");

    // --- 2. Initialize Service Adapters ---
    let generator = Arc::new(GeminiTextAdapter::new(
        GeminiTextAdapter::client(&config.gemini_api_key, &config.gemini_api_base),
        config.gemini_model.clone(),
    ));

    let orchestrator = match &config.tts {
        Some(settings) => {
            Orchestrator::new(generator, speech_adapter(settings, reqwest::Client::new())?)
        }
        None => Orchestrator::text_only(generator),
    };

    let output = match config.response_mode {
        ResponseMode::Inline => OutputMode::Inline,
        ResponseMode::File => OutputMode::File(Arc::new(FsAudioStore::new(&config.output_dir))),
        ResponseMode::TextOnly => OutputMode::TextOnly,
    };
    info!(
        model = %config.gemini_model,
        response_mode = ?output.response_mode(),
        "Service adapters initialized"
    );

    // --- 3. Build the Shared AppState ---
    let app_state = Arc::new(AppState::new(orchestrator, output)?);

    let allowed_origin = config.allowed_origin.parse::<HeaderValue>().map_err(|e| {
        ApiError::Internal(format!(
            "Invalid ALLOWED_ORIGIN '{}': {}",
            config.allowed_origin, e
        ))
    })?;
    let cors = CorsLayer::new()
        .allow_origin(allowed_origin)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([CONTENT_TYPE]);

    // --- 4. Create the Web Router ---
    let api_router = web::router(app_state)
        .layer(DefaultBodyLimit::max(1024 * 1024))
        .layer(cors);

    // Merge the API router with the Swagger UI router for a complete application.
    let app = Router::new()
        .merge(api_router)
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()));

    // --- 5. Start the Server ---
    info!("Server is running on http://{}", config.bind_address);
    info!(
        "Swagger UI available at http://{}/swagger-ui",
        config.bind_address
    );
    let listener = tokio::net::TcpListener::bind(&config.bind_address).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
