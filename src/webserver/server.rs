/// Axum webserver implementation
///
/// Main server lifecycle management including startup, shutdown, and graceful termination
use axum::Router;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::sync::Notify;
use tower_http::cors::CorsLayer;

use crate::{
    arguments,
    config::Config,
    logger::{self, LogTag},
    webserver::{routes, state::AppState},
};

/// Global shutdown notifier
static SHUTDOWN_NOTIFY: once_cell::sync::Lazy<Arc<Notify>> =
    once_cell::sync::Lazy::new(|| Arc::new(Notify::new()));

/// Start the webserver
///
/// This function blocks until the server is shut down
pub async fn start_server(config: Config) -> Result<(), String> {
    // CLI overrides win over the config file
    let host = arguments::get_host_override().unwrap_or_else(|| config.webserver.host.clone());
    let port = arguments::get_port_override().unwrap_or(config.webserver.port);

    logger::info(
        LogTag::Webserver,
        &format!("Starting webserver on {}:{}", host, port),
    );

    // Create application state
    let state = Arc::new(AppState::new(config).map_err(|e| e.to_string())?);

    // Build the router
    let app = build_app(state.clone());

    // Parse bind address
    let addr: SocketAddr = format!("{}:{}", host, port)
        .parse()
        .map_err(|e| format!("Invalid bind address {}:{}: {}", host, port, e))?;

    // Create TCP listener
    let listener = TcpListener::bind(&addr).await.map_err(|e| {
        // Provide helpful error message for common cases
        match e.kind() {
            std::io::ErrorKind::AddrInUse => {
                format!(
                    "Failed to bind to {}: Address already in use\n\
                     \n\
                     Another instance of signal-relay (or another service) is using this port.\n\
                     \n\
                     To verify and stop other instances:\n\
                       1. Check: ps aux | grep signal-relay | grep -v grep\n\
                       2. Stop: pkill -f signal-relay\n\
                       3. Or pick another port: signal-relay --port <PORT>",
                    addr
                )
            }
            std::io::ErrorKind::PermissionDenied => {
                format!(
                    "Failed to bind to {}: Permission denied\n\
                     \n\
                     Port {} requires elevated privileges on this system.\n\
                     Consider using a port above 1024 or running with appropriate permissions.",
                    addr, port
                )
            }
            _ => format!("Failed to bind to {}: {}", addr, e),
        }
    })?;

    logger::info(
        LogTag::Webserver,
        &format!("Webserver listening on http://{}", addr),
    );
    logger::info(
        LogTag::Webserver,
        &format!("Signaling endpoint: ws://{}/ws/<username>", addr),
    );

    // Run the server with graceful shutdown
    let shutdown_signal = async {
        SHUTDOWN_NOTIFY.notified().await;
        logger::info(
            LogTag::Webserver,
            "Received shutdown signal, stopping webserver...",
        );
    };

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal)
        .await
        .map_err(|e| format!("Server error: {}", e))?;

    logger::info(LogTag::Webserver, "Webserver stopped gracefully");

    Ok(())
}

/// Trigger webserver shutdown
pub fn shutdown() {
    logger::debug(LogTag::Webserver, "Triggering webserver shutdown...");
    SHUTDOWN_NOTIFY.notify_one();
}

/// Build the Axum application with all routes and middleware
fn build_app(state: Arc<AppState>) -> Router {
    let cors_permissive = state.config.webserver.cors_permissive;

    // Create main router
    let app = routes::create_router(state);

    // Browser clients connect from arbitrary origins
    if cors_permissive {
        app.layer(CorsLayer::permissive())
    } else {
        app
    }
}
