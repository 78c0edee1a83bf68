//! Language-model access for the chat pipeline.
//!
//! # Module Structure
//!
//! - `ollama`: HTTP client for a local Ollama server
//! - `gemini`: HTTP client for the Google Gemini API
//! - `prompts`: System prompt and message builders
//! - `reply`: Parsing the `ANALYSIS:` / `RESPONSE:` reply format
//! - `bounded`: Timeout and cancellation around a single call
//!
//! # Example
//!
//! ```no_run
//! use calmly::ai::{ChatModel, Message, OllamaClient};
//!
//! # async fn run() -> Result<(), calmly::errors::AIError> {
//! let client = OllamaClient::new("http://127.0.0.1:11434", "llama3.2:3b");
//! let reply = client.chat(&[Message::user("Hello")]).await?;
//! # Ok(())
//! # }
//! ```

pub mod bounded;
pub mod gemini;
pub mod ollama;
pub mod prompts;
pub mod reply;

// Re-export commonly used types
pub use bounded::bounded_chat;
pub use gemini::GeminiClient;
pub use ollama::{Message, OllamaClient};
pub use prompts::{analysis_prompt, recent_user_text, SYSTEM_PROMPT};
pub use reply::{parse_reply, Analysis, ModelReply};

use crate::config::{Config, Provider};
use crate::errors::AIError;
use async_trait::async_trait;

/// Result type for language-model calls.
pub type AIResult<T> = Result<T, AIError>;

/// A chat-completion backend.
///
/// Implementations send the whole conversation and return the assistant's
/// text. They do not enforce timeouts; see [`bounded_chat`].
#[async_trait]
pub trait ChatModel: Send + Sync {
    /// Sends `messages` and returns the model's reply text.
    async fn chat(&self, messages: &[Message]) -> AIResult<String>;

    /// Model identifier, for logging.
    fn model_name(&self) -> &str;
}

/// Builds the client for the configured provider.
pub fn model_from_config(config: &Config) -> Box<dyn ChatModel> {
    match config.provider {
        Provider::Ollama => Box::new(OllamaClient::new(&config.ollama_url, &config.chat_model)),
        Provider::Gemini => Box::new(GeminiClient::new(
            &config.gemini_url,
            &config.chat_model,
            config.google_api_key.clone(),
        )),
    }
}
