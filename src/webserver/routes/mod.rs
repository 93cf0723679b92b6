use axum::Router;
use std::sync::Arc;

use crate::webserver::state::AppState;

pub mod media;
pub mod memory;
pub mod status;
pub mod ws;

pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .merge(ws::routes())
        .nest("/api", api_routes())
        .with_state(state)
}

/// All /api/* routes, merged from the per-module route files
fn api_routes() -> Router<Arc<AppState>> {
    Router::new()
        .merge(status::routes())
        .merge(media::routes())
        .merge(memory::routes())
}
