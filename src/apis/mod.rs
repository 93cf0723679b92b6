/// Outbound HTTP clients
///
/// `client` holds the shared reqwest wrapper and rate limiter; `openai` is
/// the OpenAI-compatible media services client (speech-to-text, image
/// generation, chat completions).

pub mod client;
pub mod openai;

pub use openai::{MediaServices, OpenAiClient};
