/// Media endpoints: speech-to-text and image generation
///
/// Both endpoints are stateless collaborator calls; the only relay
/// involvement is delivering the final result to the requesting user's live
/// connection via unicast.
use axum::{extract::State, http::StatusCode, response::Response, routing::post, Json, Router};
use base64::Engine;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::{
    core::RelayError,
    logger::{self, LogTag},
    webserver::{
        state::AppState,
        utils::{error_response, success_response},
        ws::ServerEvent,
    },
};

/// Request body for POST /api/transcribe
#[derive(Debug, Deserialize)]
pub struct TranscribeRequest {
    pub username: String,
    pub audio_base64: String,
    #[serde(default)]
    pub filename: Option<String>,
}

/// Response payload for POST /api/transcribe
#[derive(Debug, Serialize)]
pub struct TranscribeResponse {
    pub text: String,
}

/// Request body for POST /api/images
#[derive(Debug, Deserialize)]
pub struct ImageRequest {
    pub username: String,
    pub prompt: String,
}

/// Response payload for POST /api/images
#[derive(Debug, Serialize)]
pub struct ImageResponse {
    pub url: String,
}

/// Create media routes
pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/transcribe", post(transcribe))
        .route("/images", post(generate_image))
}

/// POST /api/transcribe
///
/// Decodes the uploaded audio, transcribes it, appends the text to the
/// user's transcript memory, and delivers the result to the user's live
/// connection.
async fn transcribe(
    State(state): State<Arc<AppState>>,
    Json(request): Json<TranscribeRequest>,
) -> Response {
    let audio = match base64::engine::general_purpose::STANDARD.decode(&request.audio_base64) {
        Ok(audio) => audio,
        Err(e) => {
            return error_response(
                StatusCode::BAD_REQUEST,
                &format!("Invalid base64 audio payload: {}", e),
            );
        }
    };

    let filename = request.filename.as_deref().unwrap_or("audio.webm");

    let text = match state.media.transcribe(audio, filename).await {
        Ok(text) => text,
        Err(e) => {
            logger::error(LogTag::Media, &format!("Transcription failed: {}", e));
            return media_error_response(&e);
        }
    };

    // Transcript memory is best-effort; a disk problem should not hide a
    // successful transcription from the caller
    if let Err(e) = state.transcripts.append(&request.username, &text) {
        logger::warning(
            LogTag::Memory,
            &format!("Failed to store transcript for {}: {}", request.username, e),
        );
    }

    let event = ServerEvent::Transcription { text: text.clone() };
    if let Err(e) = deliver_event(&state, &request.username, event).await {
        return delivery_error_response(&e);
    }

    success_response(TranscribeResponse { text })
}

/// POST /api/images
async fn generate_image(
    State(state): State<Arc<AppState>>,
    Json(request): Json<ImageRequest>,
) -> Response {
    let url = match state.media.generate_image(&request.prompt).await {
        Ok(url) => url,
        Err(e) => {
            logger::error(LogTag::Media, &format!("Image generation failed: {}", e));
            return media_error_response(&e);
        }
    };

    let event = ServerEvent::ImageGenerated {
        url: url.clone(),
        prompt: request.prompt.clone(),
    };
    if let Err(e) = deliver_event(&state, &request.username, event).await {
        return delivery_error_response(&e);
    }

    success_response(ImageResponse { url })
}

/// Deliver a media result to the requesting user via unicast
async fn deliver_event(
    state: &Arc<AppState>,
    username: &str,
    event: ServerEvent,
) -> Result<(), RelayError> {
    let frame = event.to_frame()?;
    state.router.unicast(username, frame).await
}

/// Map media-service failures to HTTP responses
fn media_error_response(error: &RelayError) -> Response {
    let status = match error {
        RelayError::Config(_) => StatusCode::SERVICE_UNAVAILABLE,
        RelayError::Api { .. } | RelayError::Http(_) => StatusCode::BAD_GATEWAY,
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    };
    error_response(status, &error.to_string())
}

/// Map delivery failures to HTTP responses (absent user is a 404)
fn delivery_error_response(error: &RelayError) -> Response {
    let status = match error {
        RelayError::RecipientNotFound { .. } => StatusCode::NOT_FOUND,
        RelayError::DeliveryFailed { .. } => StatusCode::CONFLICT,
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    };
    error_response(status, &error.to_string())
}
