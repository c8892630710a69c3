//! services/api/src/web/rest.rs
//!
//! Contains the Axum handlers for the REST API endpoints and the master
//! definition for the OpenAPI specification.

use crate::error::{ApiError, ErrorResponse};
use crate::web::protocol::{
    GenerateRequest, GenerateResponse, InlineAudioResponse, SavedAudioResponse, TextResponse,
};
use crate::web::state::{AppState, OutputMode};
use axum::{
    extract::{rejection::JsonRejection, State},
    response::Json,
};
use persona_voice_core::{GenerationRequest, Stage};
use std::sync::Arc;
use tracing::{debug, info, instrument, warn};
use utoipa::OpenApi;
use uuid::Uuid;

pub const GREETING: &str = "Persona voice service is running.";

//=========================================================================================
// OpenAPI Master Definition
//=========================================================================================

#[derive(OpenApi)]
#[openapi(
    paths(
        health_handler,
        generate_handler,
    ),
    components(
        schemas(
            GenerateRequest,
            GenerateResponse,
            InlineAudioResponse,
            SavedAudioResponse,
            TextResponse,
            ErrorResponse
        )
    ),
    tags(
        (name = "Persona Voice API", description = "Generate persona-flavoured text and speak it.")
    )
)]
pub struct ApiDoc;

//=========================================================================================
// REST API Handlers
//=========================================================================================

/// Health check.
#[utoipa::path(
    get,
    path = "/",
    responses(
        (status = 200, description = "The service is up", body = String, content_type = "text/plain")
    )
)]
pub async fn health_handler() -> &'static str {
    GREETING
}

/// Generate text in a persona's voice and synthesize it to speech.
///
/// The success body depends on the server's response mode: inline base64 audio
/// (default), the path of a saved MP3 file, or text only.
#[utoipa::path(
    post,
    path = "/api/generate",
    request_body = GenerateRequest,
    responses(
        (status = 200, description = "Text (and audio) generated", body = GenerateResponse),
        (status = 400, description = "Missing persona or prompt, or unreadable JSON", body = ErrorResponse),
        (status = 500, description = "An upstream API or the audio store failed", body = ErrorResponse)
    )
)]
#[instrument(skip_all, fields(request_id = %Uuid::new_v4()))]
pub async fn generate_handler(
    State(app_state): State<Arc<AppState>>,
    payload: Result<Json<GenerateRequest>, JsonRejection>,
) -> Result<Json<GenerateResponse>, ApiError> {
    debug!(from = %Stage::Idle, to = %Stage::Validating, "Pipeline stage transition");
    let Json(payload) = payload.map_err(|e| ApiError::MalformedBody(e.body_text()))?;
    let (persona, prompt) = payload.into_parts();
    let request = GenerationRequest::new(persona, prompt).map_err(|e| {
        warn!("Rejected generate request: {}", e);
        e
    })?;
    info!(
        persona = %request.persona(),
        prompt_chars = request.prompt().chars().count(),
        "Handling generate request"
    );

    let orchestrator = &app_state.orchestrator;
    let response = match &app_state.output {
        OutputMode::Inline => {
            let narration = orchestrator.generate_and_synthesize(&request).await?;
            GenerateResponse::Inline(InlineAudioResponse {
                audio_content: narration.audio.to_base64(),
                text: narration.text.into_string(),
            })
        }
        OutputMode::File(store) => {
            let narration = orchestrator.generate_and_synthesize(&request).await?;
            let stored = store.save(&narration.audio).await?;
            info!(
                path = %stored.path.display(),
                created_at = %stored.created_at,
                "Audio saved"
            );
            GenerateResponse::Saved(SavedAudioResponse {
                message: "Audio generated successfully.".to_string(),
                file_path: stored.path.display().to_string(),
            })
        }
        OutputMode::TextOnly => {
            let text = orchestrator.generate(&request).await?;
            debug!(from = %Stage::Generating, to = %Stage::Done, "Pipeline stage transition");
            GenerateResponse::Text(TextResponse {
                text: text.into_string(),
            })
        }
    };

    Ok(Json(response))
}
