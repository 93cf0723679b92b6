/// Log tags for the signal relay modules
///
/// Each tag maps to one area of the codebase and to one --debug-<module>
/// flag, so diagnostics can be enabled per module.

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LogTag {
    /// Startup, shutdown, and process-level events
    System,
    /// Configuration loading and validation
    Config,
    /// HTTP layer (axum server, routes)
    Webserver,
    /// WebSocket connection lifecycle
    Ws,
    /// Registry and routing (broadcast/unicast/notify)
    Relay,
    /// Media service calls (transcription, images, chat)
    Media,
    /// Transcript memory storage
    Memory,
    /// Test-only tag
    Test,
}

impl LogTag {
    /// Fixed-width label shown in console output
    pub fn label(&self) -> &'static str {
        match self {
            LogTag::System => "SYSTEM",
            LogTag::Config => "CONFIG",
            LogTag::Webserver => "WEB",
            LogTag::Ws => "WS",
            LogTag::Relay => "RELAY",
            LogTag::Media => "MEDIA",
            LogTag::Memory => "MEMORY",
            LogTag::Test => "TEST",
        }
    }

    /// Key used by the --debug-<key> flag for this tag
    pub fn to_debug_key(&self) -> String {
        match self {
            LogTag::System => "system".to_string(),
            LogTag::Config => "config".to_string(),
            LogTag::Webserver => "webserver".to_string(),
            LogTag::Ws => "ws".to_string(),
            LogTag::Relay => "relay".to_string(),
            LogTag::Media => "media".to_string(),
            LogTag::Memory => "memory".to_string(),
            LogTag::Test => "test".to_string(),
        }
    }

    /// Plain (uncolored) label for file output
    pub fn to_plain_string(&self) -> String {
        self.label().to_string()
    }
}

impl std::fmt::Display for LogTag {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_debug_keys_are_lowercase() {
        for tag in [
            LogTag::System,
            LogTag::Config,
            LogTag::Webserver,
            LogTag::Ws,
            LogTag::Relay,
            LogTag::Media,
            LogTag::Memory,
            LogTag::Test,
        ] {
            let key = tag.to_debug_key();
            assert_eq!(key, key.to_lowercase());
            assert!(!key.is_empty());
        }
    }
}
