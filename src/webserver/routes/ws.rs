/// WebSocket signaling endpoint
///
/// `GET /ws/:username` upgrades to the persistent duplex connection for that
/// identity. Everything after the upgrade is handled by the relay core
/// (`webserver::ws`): registration, presence notifications, routing, and
/// cleanup.
use axum::{
    extract::{ws::WebSocketUpgrade, Path, State},
    response::Response,
    routing::get,
    Router,
};
use std::sync::Arc;

use crate::{
    arguments::is_debug_ws_enabled,
    logger::{self, LogTag},
    webserver::{state::AppState, ws::handle_connection},
};

/// Create WebSocket routes (mounted at the root, not under /api)
pub fn routes() -> Router<Arc<AppState>> {
    Router::new().route("/ws/:username", get(ws_handler))
}

/// GET /ws/:username
async fn ws_handler(
    ws: WebSocketUpgrade,
    Path(username): Path<String>,
    State(state): State<Arc<AppState>>,
) -> Response {
    if is_debug_ws_enabled() {
        logger::debug(
            LogTag::Ws,
            &format!("Upgrade requested for username '{}'", username),
        );
    }

    ws.on_upgrade(move |socket| handle_connection(socket, username, state))
}
