/// Relay message schema
///
/// The relay is payload-agnostic: inbound frames are forwarded verbatim.
/// The only structure it understands is the optional `{"to": ...}` envelope
/// used to pick unicast over broadcast, plus the structured server events it
/// emits itself (presence changes, media results, errors).
use serde::{Deserialize, Serialize};

// ============================================================================
// OUTBOUND FRAMES
// ============================================================================

/// One queued outbound frame for a connection
///
/// `Close` asks the owning connection task to send a WebSocket close and
/// exit; it is how a superseded connection gets torn down.
#[derive(Debug, Clone, PartialEq)]
pub enum RelayFrame {
    Text(String),
    Binary(Vec<u8>),
    Close,
}

impl RelayFrame {
    /// Short description for logs
    pub fn kind(&self) -> &'static str {
        match self {
            RelayFrame::Text(_) => "text",
            RelayFrame::Binary(_) => "binary",
            RelayFrame::Close => "close",
        }
    }
}

// ============================================================================
// SERVER EVENTS (Server → Client)
// ============================================================================

/// Structured events emitted by the relay itself
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ServerEvent {
    /// A user joined (sent to everyone else)
    UserConnected { username: String },

    /// A user left (sent to everyone else)
    UserDisconnected { username: String },

    /// Transcription result for this user's audio
    Transcription { text: String },

    /// Generated image for this user's prompt
    ImageGenerated { url: String, prompt: String },

    /// Error report delivered back to a sender
    Error { message: String },
}

impl ServerEvent {
    /// Serialize to JSON text
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Serialize into an outbound frame
    pub fn to_frame(&self) -> Result<RelayFrame, serde_json::Error> {
        Ok(RelayFrame::Text(self.to_json()?))
    }
}

// ============================================================================
// INBOUND ROUTING
// ============================================================================

/// Minimal view of an inbound frame used only for routing
#[derive(Debug, Deserialize)]
struct TargetedEnvelope {
    to: String,
}

/// Extract the unicast target of an inbound text frame, if any.
///
/// A frame routes as unicast only when it parses as a JSON object with a
/// string `to` field; anything else (plain text, arrays, malformed JSON)
/// is broadcast. The payload itself stays opaque and is forwarded verbatim.
pub fn routing_target(text: &str) -> Option<String> {
    serde_json::from_str::<TargetedEnvelope>(text)
        .ok()
        .map(|envelope| envelope.to)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_routing_target_present() {
        let target = routing_target(r#"{"to":"carol","msg":"hi"}"#);
        assert_eq!(target, Some("carol".to_string()));
    }

    #[test]
    fn test_routing_target_absent_or_malformed() {
        assert_eq!(routing_target("hello"), None);
        assert_eq!(routing_target(r#"{"msg":"hi"}"#), None);
        assert_eq!(routing_target(r#"{"to":42}"#), None);
        assert_eq!(routing_target(r#"["to","carol"]"#), None);
        assert_eq!(routing_target(r#"{"to":"#), None);
    }

    #[test]
    fn test_server_event_json_shape() {
        let event = ServerEvent::UserConnected {
            username: "alice".to_string(),
        };
        assert_eq!(
            event.to_json().unwrap(),
            r#"{"type":"user_connected","username":"alice"}"#
        );

        let event = ServerEvent::UserDisconnected {
            username: "bob".to_string(),
        };
        assert_eq!(
            event.to_json().unwrap(),
            r#"{"type":"user_disconnected","username":"bob"}"#
        );
    }

    #[test]
    fn test_server_event_to_frame() {
        let event = ServerEvent::Transcription {
            text: "hello world".to_string(),
        };
        match event.to_frame().unwrap() {
            RelayFrame::Text(json) => {
                assert!(json.contains("\"type\":\"transcription\""));
                assert!(json.contains("hello world"));
            }
            other => panic!("expected text frame, got {:?}", other),
        }
    }
}
