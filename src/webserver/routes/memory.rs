/// Transcript memory endpoint
///
/// Feeds a user's stored transcript to the chat-completions API and returns
/// suggested follow-up conversation ideas.
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Response,
    routing::get,
    Router,
};
use serde::Serialize;
use std::sync::Arc;

use crate::{
    arguments::is_debug_memory_enabled,
    logger::{self, LogTag},
    webserver::{
        state::AppState,
        utils::{error_response, success_response},
    },
};

/// Returned when a user has no stored transcript yet
const NO_HISTORY_MESSAGE: &str = "No conversation history yet.";

/// Response payload for GET /api/memory/:username/followups
#[derive(Debug, Serialize)]
pub struct FollowupsResponse {
    pub username: String,
    pub ideas: String,
}

/// Create memory routes
pub fn routes() -> Router<Arc<AppState>> {
    Router::new().route("/memory/:username/followups", get(followups))
}

/// GET /api/memory/:username/followups
async fn followups(
    State(state): State<Arc<AppState>>,
    Path(username): Path<String>,
) -> Response {
    let history = match state.transcripts.history_text(&username) {
        Ok(history) => history,
        Err(e) => {
            logger::error(
                LogTag::Memory,
                &format!("Failed to load transcript for {}: {}", username, e),
            );
            return error_response(StatusCode::INTERNAL_SERVER_ERROR, &e.to_string());
        }
    };

    // No stored history: answer directly without calling the chat API
    if history.trim().is_empty() {
        if is_debug_memory_enabled() {
            logger::debug(LogTag::Memory, &format!("No history for {}", username));
        }
        return success_response(FollowupsResponse {
            username,
            ideas: NO_HISTORY_MESSAGE.to_string(),
        });
    }

    match state.media.followup_ideas(&history).await {
        Ok(ideas) => success_response(FollowupsResponse { username, ideas }),
        Err(e) => {
            logger::error(
                LogTag::Media,
                &format!("Follow-up suggestion failed for {}: {}", username, e),
            );
            error_response(StatusCode::BAD_GATEWAY, &e.to_string())
        }
    }
}
