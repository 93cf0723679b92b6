/// OpenAI-compatible API request/response types
///
/// Covers the three endpoints the relay's media surface uses:
/// /audio/transcriptions, /images/generations, /chat/completions.
use serde::{Deserialize, Serialize};

// ============================================================================
// TRANSCRIPTION
// ============================================================================

/// Response from /audio/transcriptions
#[derive(Debug, Clone, Deserialize)]
pub struct TranscriptionResponse {
    pub text: String,
}

// ============================================================================
// IMAGE GENERATION
// ============================================================================

/// Request for /images/generations
#[derive(Debug, Clone, Serialize)]
pub struct ImageGenerationRequest {
    pub model: String,
    pub prompt: String,
    pub n: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size: Option<String>,
}

/// Response from /images/generations
#[derive(Debug, Clone, Deserialize)]
pub struct ImageGenerationResponse {
    pub data: Vec<GeneratedImage>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GeneratedImage {
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub revised_prompt: Option<String>,
}

// ============================================================================
// CHAT COMPLETIONS
// ============================================================================

/// Request for /chat/completions
#[derive(Debug, Clone, Serialize)]
pub struct ChatRequest {
    pub model: String,
    pub messages: Vec<ChatMessage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_tokens: Option<u32>,
}

/// Message in chat format
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessage {
    /// Role: "system", "user", or "assistant"
    pub role: String,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: "system".to_string(),
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: "user".to_string(),
            content: content.into(),
        }
    }
}

/// Response from /chat/completions
#[derive(Debug, Clone, Deserialize)]
pub struct ChatResponse {
    pub choices: Vec<ChatChoice>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ChatChoice {
    pub message: ChatResponseMessage,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ChatResponseMessage {
    pub content: Option<String>,
}

// ============================================================================
// ERRORS
// ============================================================================

/// Error body returned by OpenAI-compatible APIs
#[derive(Debug, Clone, Deserialize)]
pub struct ApiErrorResponse {
    pub error: ApiErrorBody,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ApiErrorBody {
    pub message: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_image_request_serialization() {
        let request = ImageGenerationRequest {
            model: "dall-e-3".to_string(),
            prompt: "a lighthouse at dusk".to_string(),
            n: 1,
            size: None,
        };

        let json = serde_json::to_string(&request).unwrap();
        assert!(json.contains("\"model\":\"dall-e-3\""));
        assert!(json.contains("lighthouse"));
        assert!(!json.contains("size"));
    }

    #[test]
    fn test_chat_response_parsing() {
        let json = r#"{
            "choices": [
                {"message": {"role": "assistant", "content": "Try asking about travel."}}
            ]
        }"#;

        let response: ChatResponse = serde_json::from_str(json).unwrap();
        assert_eq!(
            response.choices[0].message.content.as_deref(),
            Some("Try asking about travel.")
        );
    }

    #[test]
    fn test_transcription_response_parsing() {
        let json = r#"{"text": "hello from the microphone"}"#;
        let response: TranscriptionResponse = serde_json::from_str(json).unwrap();
        assert_eq!(response.text, "hello from the microphone");
    }
}
