/// OpenAI-compatible media services client
///
/// The relay core never touches audio or image bytes itself; route handlers
/// call through the [`MediaServices`] trait, and the only production
/// implementation is this thin HTTP client. Tests substitute a stub.
///
/// Endpoints used:
/// 1. POST /audio/transcriptions (multipart) - speech-to-text
/// 2. POST /images/generations - prompt-to-image
/// 3. POST /chat/completions - follow-up idea suggestions

pub mod types;

use async_trait::async_trait;
use reqwest::multipart;

use crate::apis::client::{build_http_client, RateLimiter};
use crate::arguments::is_debug_media_enabled;
use crate::config::MediaConfig;
use crate::core::{RelayError, RelayResult};
use crate::logger::{self, LogTag};

use self::types::{
    ApiErrorResponse, ChatMessage, ChatRequest, ChatResponse, ImageGenerationRequest,
    ImageGenerationResponse, TranscriptionResponse,
};

const PROVIDER: &str = "openai";

/// External media operations used by the HTTP surface
#[async_trait]
pub trait MediaServices: Send + Sync {
    /// Transcribe an audio blob to text
    async fn transcribe(&self, audio: Vec<u8>, filename: &str) -> RelayResult<String>;

    /// Generate an image for a prompt, returning its URL
    async fn generate_image(&self, prompt: &str) -> RelayResult<String>;

    /// Suggest follow-up conversation ideas for a transcript
    async fn followup_ideas(&self, transcript: &str) -> RelayResult<String>;
}

// ============================================================================
// CLIENT IMPLEMENTATION
// ============================================================================

pub struct OpenAiClient {
    http: reqwest::Client,
    limiter: RateLimiter,
    config: MediaConfig,
}

impl OpenAiClient {
    pub fn new(config: MediaConfig) -> RelayResult<Self> {
        let http = build_http_client(&config)?;
        let limiter = RateLimiter::new(&config);

        Ok(Self {
            http,
            limiter,
            config,
        })
    }

    pub fn is_enabled(&self) -> bool {
        self.config.enabled && !self.config.api_key.is_empty()
    }

    fn ensure_enabled(&self) -> RelayResult<()> {
        if self.is_enabled() {
            Ok(())
        } else {
            Err(RelayError::Config(
                "Media services are disabled or missing an API key".to_string(),
            ))
        }
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.config.api_base.trim_end_matches('/'), path)
    }

    /// Map a non-success response to an API error, extracting the provider
    /// message when the body parses
    async fn api_error(response: reqwest::Response) -> RelayError {
        let status = response.status();
        let message = match response.json::<ApiErrorResponse>().await {
            Ok(body) => body.error.message,
            Err(_) => format!("HTTP {}", status),
        };
        RelayError::Api {
            provider: PROVIDER.to_string(),
            message,
        }
    }
}

#[async_trait]
impl MediaServices for OpenAiClient {
    async fn transcribe(&self, audio: Vec<u8>, filename: &str) -> RelayResult<String> {
        self.ensure_enabled()?;
        let _guard = self.limiter.acquire().await?;

        if is_debug_media_enabled() {
            logger::debug(
                LogTag::Media,
                &format!("Transcribing {} ({} bytes)", filename, audio.len()),
            );
        }

        let part = multipart::Part::bytes(audio).file_name(filename.to_string());
        let form = multipart::Form::new()
            .part("file", part)
            .text("model", self.config.transcription_model.clone());

        let response = self
            .http
            .post(self.endpoint("audio/transcriptions"))
            .bearer_auth(&self.config.api_key)
            .multipart(form)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(Self::api_error(response).await);
        }

        let body: TranscriptionResponse = response.json().await?;
        Ok(body.text)
    }

    async fn generate_image(&self, prompt: &str) -> RelayResult<String> {
        self.ensure_enabled()?;
        let _guard = self.limiter.acquire().await?;

        if is_debug_media_enabled() {
            logger::debug(LogTag::Media, &format!("Generating image for: {}", prompt));
        }

        let request = ImageGenerationRequest {
            model: self.config.image_model.clone(),
            prompt: prompt.to_string(),
            n: 1,
            size: None,
        };

        let response = self
            .http
            .post(self.endpoint("images/generations"))
            .bearer_auth(&self.config.api_key)
            .json(&request)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(Self::api_error(response).await);
        }

        let body: ImageGenerationResponse = response.json().await?;
        body.data
            .into_iter()
            .find_map(|image| image.url)
            .ok_or_else(|| RelayError::Api {
                provider: PROVIDER.to_string(),
                message: "Image response contained no URL".to_string(),
            })
    }

    async fn followup_ideas(&self, transcript: &str) -> RelayResult<String> {
        self.ensure_enabled()?;
        let _guard = self.limiter.acquire().await?;

        let request = ChatRequest {
            model: self.config.chat_model.clone(),
            messages: vec![
                ChatMessage::system(
                    "You suggest short follow-up conversation ideas based on a \
                     transcript of what a user said. Reply with a concise list.",
                ),
                ChatMessage::user(transcript),
            ],
            temperature: Some(0.7),
            max_tokens: Some(300),
        };

        let response = self
            .http
            .post(self.endpoint("chat/completions"))
            .bearer_auth(&self.config.api_key)
            .json(&request)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(Self::api_error(response).await);
        }

        let body: ChatResponse = response.json().await?;
        body.choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .ok_or_else(|| RelayError::Api {
                provider: PROVIDER.to_string(),
                message: "Chat response contained no content".to_string(),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;

    #[test]
    fn test_disabled_without_api_key() {
        let config = Config::default().media; // default has an empty key
        let client = OpenAiClient::new(config).unwrap();
        assert!(!client.is_enabled());
    }

    #[test]
    fn test_endpoint_joins_cleanly() {
        let mut config = Config::default().media;
        config.api_base = "https://api.example.com/v1/".to_string();
        let client = OpenAiClient::new(config).unwrap();
        assert_eq!(
            client.endpoint("images/generations"),
            "https://api.example.com/v1/images/generations"
        );
    }

    #[tokio::test]
    async fn test_disabled_client_rejects_calls() {
        let config = Config::default().media;
        let client = OpenAiClient::new(config).unwrap();

        let result = client.generate_image("a test prompt").await;
        assert!(matches!(result, Err(RelayError::Config(_))));
    }
}
