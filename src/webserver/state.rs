/// Shared application state for the webserver
///
/// Holds the registry, router, media client, and transcript store that the
/// route handlers and connection tasks share.
use std::sync::Arc;

use crate::{
    apis::{MediaServices, OpenAiClient},
    config::Config,
    core::RelayResult,
    paths,
    transcripts::TranscriptStore,
    webserver::ws::{ConnectionRegistry, SignalRouter},
};

/// Shared application state passed to all route handlers
#[derive(Clone)]
pub struct AppState {
    /// Full configuration (read-only after startup)
    pub config: Arc<Config>,

    /// Identity → connection registry (single source of truth for presence)
    pub registry: Arc<ConnectionRegistry>,

    /// Delivery policy over the registry
    pub router: SignalRouter,

    /// Media services client (trait object so tests can stub it)
    pub media: Arc<dyn MediaServices>,

    /// Per-user transcript memory
    pub transcripts: Arc<TranscriptStore>,

    /// Server startup time
    pub startup_time: chrono::DateTime<chrono::Utc>,
}

impl AppState {
    /// Create application state with the production media client
    pub fn new(config: Config) -> RelayResult<Self> {
        let media = Arc::new(OpenAiClient::new(config.media.clone())?);
        Ok(Self::with_media(config, media))
    }

    /// Create application state with an injected media implementation
    pub fn with_media(config: Config, media: Arc<dyn MediaServices>) -> Self {
        let registry = ConnectionRegistry::new(config.relay.outbound_queue_capacity);
        let router = SignalRouter::new(Arc::clone(&registry));

        let transcripts_dir = if config.memory.transcripts_dir.is_empty() {
            paths::get_transcripts_directory()
        } else {
            config.memory.transcripts_dir.clone().into()
        };

        Self {
            config: Arc::new(config),
            registry,
            router,
            media,
            transcripts: Arc::new(TranscriptStore::new(transcripts_dir)),
            startup_time: chrono::Utc::now(),
        }
    }

    /// Get server uptime in seconds
    pub fn uptime_seconds(&self) -> u64 {
        (chrono::Utc::now() - self.startup_time)
            .num_seconds()
            .max(0) as u64
    }
}
