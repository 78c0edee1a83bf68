//! Configuration management for the calmly application.
//!
//! This module handles loading and validating configuration settings from environment
//! variables, with sensible defaults.
//!
//! # Environment Variables
//!
//! - `CALMLY_DIR`: Directory holding persisted state (defaults to ~/.local/share/calmly)
//! - `CALMLY_PROVIDER`: `ollama` (default) or `gemini`
//! - `CALMLY_OLLAMA_URL`: Ollama base URL (defaults to http://127.0.0.1:11434)
//! - `CALMLY_GEMINI_URL`: Gemini base URL
//! - `CALMLY_MODEL`: Chat model name (default depends on the provider)
//! - `CALMLY_TIMEOUT_SECS`: Bound on a single model call (defaults to 15)
//! - `GOOGLE_API_KEY`: API key for the Gemini provider
//! - `HOME`: Used for expanding the default data directory path

use crate::constants::{
    DEFAULT_DATA_SUBDIR, DEFAULT_GEMINI_MODEL, DEFAULT_GEMINI_URL, DEFAULT_OLLAMA_MODEL,
    DEFAULT_OLLAMA_URL, DEFAULT_TIMEOUT_SECS, ENV_VAR_CALMLY_DIR, ENV_VAR_CALMLY_GEMINI_URL,
    ENV_VAR_CALMLY_MODEL, ENV_VAR_CALMLY_OLLAMA_URL, ENV_VAR_CALMLY_PROVIDER,
    ENV_VAR_CALMLY_TIMEOUT_SECS, ENV_VAR_GOOGLE_API_KEY, ENV_VAR_HOME, MAX_TIMEOUT_SECS,
};
use crate::errors::{AppError, AppResult};
use std::env;
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

/// Which language-model backend answers chat turns.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Provider {
    /// A local Ollama server.
    Ollama,
    /// The Google Generative Language API.
    Gemini,
}

impl Provider {
    /// Model used when `CALMLY_MODEL` is not set.
    pub fn default_model(&self) -> &'static str {
        match self {
            Provider::Ollama => DEFAULT_OLLAMA_MODEL,
            Provider::Gemini => DEFAULT_GEMINI_MODEL,
        }
    }
}

impl FromStr for Provider {
    type Err = AppError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_lowercase().as_str() {
            "ollama" => Ok(Provider::Ollama),
            "gemini" | "google" => Ok(Provider::Gemini),
            other => Err(AppError::Config(format!(
                "Unknown provider '{}'. Expected 'ollama' or 'gemini'",
                other
            ))),
        }
    }
}

/// Configuration for the calmly application.
///
/// # Examples
///
/// Creating a configuration manually:
/// ```
/// use calmly::Config;
/// use calmly::config::Provider;
/// use std::path::PathBuf;
/// use std::time::Duration;
///
/// let config = Config {
///     data_dir: PathBuf::from("/tmp/calmly"),
///     provider: Provider::Ollama,
///     ollama_url: "http://127.0.0.1:11434".to_string(),
///     gemini_url: "https://generativelanguage.googleapis.com".to_string(),
///     chat_model: "llama3.2:3b".to_string(),
///     google_api_key: None,
///     request_timeout: Duration::from_secs(15),
/// };
/// assert!(config.validate().is_ok());
/// ```
#[derive(Clone)]
pub struct Config {
    /// Directory where the mood history and exercise store blobs live.
    pub data_dir: PathBuf,

    /// Language-model backend.
    pub provider: Provider,

    /// Base URL of the Ollama API.
    pub ollama_url: String,

    /// Base URL of the Gemini API.
    pub gemini_url: String,

    /// Chat model name passed to the provider.
    pub chat_model: String,

    /// API key for the Gemini provider. Only checked when a call is made.
    pub google_api_key: Option<String>,

    /// Upper bound on a single model call.
    pub request_timeout: Duration,
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("data_dir", &"[REDACTED_PATH]")
            .field("provider", &self.provider)
            .field("ollama_url", &self.ollama_url)
            .field("gemini_url", &self.gemini_url)
            .field("chat_model", &self.chat_model)
            .field(
                "google_api_key",
                &self.google_api_key.as_ref().map(|_| "[REDACTED]"),
            )
            .field("request_timeout", &self.request_timeout)
            .finish()
    }
}

impl Default for Config {
    /// Creates a new Config with default values.
    fn default() -> Self {
        Config {
            data_dir: PathBuf::from(""),
            provider: Provider::Ollama,
            ollama_url: DEFAULT_OLLAMA_URL.to_string(),
            gemini_url: DEFAULT_GEMINI_URL.to_string(),
            chat_model: DEFAULT_OLLAMA_MODEL.to_string(),
            google_api_key: None,
            request_timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }
}

impl Config {
    /// Loads configuration from environment variables with sensible defaults.
    ///
    /// The data directory path is expanded with `shellexpand` to handle `~` and
    /// environment variable references.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Config` if:
    /// - The data directory path expansion fails or yields an empty path
    /// - `CALMLY_PROVIDER` names an unknown provider
    /// - `CALMLY_TIMEOUT_SECS` is not a whole number of seconds
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use calmly::Config;
    ///
    /// match Config::load() {
    ///     Ok(config) => println!("Using model: {}", config.chat_model),
    ///     Err(err) => eprintln!("Failed to load config: {}", err),
    /// }
    /// ```
    pub fn load() -> AppResult<Self> {
        let data_dir_str = env::var(ENV_VAR_CALMLY_DIR).unwrap_or_else(|_| {
            let home = env::var(ENV_VAR_HOME).unwrap_or_default();
            format!("{}/{}", home, DEFAULT_DATA_SUBDIR)
        });

        let expanded_path = shellexpand::full(&data_dir_str)
            .map_err(|e| AppError::Config(format!("Failed to expand path: {}", e)))?;
        let data_dir = PathBuf::from(expanded_path.into_owned());

        if data_dir.as_os_str().is_empty() {
            return Err(AppError::Config("Data directory path is empty".to_string()));
        }

        let provider = match env::var(ENV_VAR_CALMLY_PROVIDER) {
            Ok(raw) => raw.parse::<Provider>()?,
            Err(_) => Provider::Ollama,
        };

        let chat_model = env::var(ENV_VAR_CALMLY_MODEL)
            .ok()
            .filter(|m| !m.trim().is_empty())
            .unwrap_or_else(|| provider.default_model().to_string());

        let request_timeout = match env::var(ENV_VAR_CALMLY_TIMEOUT_SECS) {
            Ok(raw) => {
                let secs = raw.trim().parse::<u64>().map_err(|_| {
                    AppError::Config(format!(
                        "{} must be a whole number of seconds, got '{}'",
                        ENV_VAR_CALMLY_TIMEOUT_SECS, raw
                    ))
                })?;
                Duration::from_secs(secs)
            }
            Err(_) => Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        };

        let google_api_key = env::var(ENV_VAR_GOOGLE_API_KEY)
            .ok()
            .filter(|k| !k.trim().is_empty());

        Ok(Config {
            data_dir,
            provider,
            ollama_url: env::var(ENV_VAR_CALMLY_OLLAMA_URL)
                .unwrap_or_else(|_| DEFAULT_OLLAMA_URL.to_string()),
            gemini_url: env::var(ENV_VAR_CALMLY_GEMINI_URL)
                .unwrap_or_else(|_| DEFAULT_GEMINI_URL.to_string()),
            chat_model,
            google_api_key,
            request_timeout,
        })
    }

    /// Validates that the configuration is usable.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Config` with one of the following messages:
    /// - "Data directory path is empty"
    /// - "Data directory must be an absolute path"
    /// - "Chat model name is empty"
    /// - "Request timeout must be between 1 and 120 seconds"
    pub fn validate(&self) -> AppResult<()> {
        if self.data_dir.as_os_str().is_empty() {
            return Err(AppError::Config("Data directory path is empty".to_string()));
        }

        if !self.data_dir.is_absolute() {
            return Err(AppError::Config(
                "Data directory must be an absolute path".to_string(),
            ));
        }

        if self.chat_model.trim().is_empty() {
            return Err(AppError::Config("Chat model name is empty".to_string()));
        }

        let secs = self.request_timeout.as_secs();
        if secs == 0 || secs > MAX_TIMEOUT_SECS {
            return Err(AppError::Config(format!(
                "Request timeout must be between 1 and {} seconds",
                MAX_TIMEOUT_SECS
            )));
        }

        Ok(())
    }
}
