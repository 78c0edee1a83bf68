//! Constants used throughout the application.
//!
//! This module contains all constants used in the calmly application, organized
//! into logical groups. Having constants centralized makes them easier to find,
//! modify, and reference consistently.

// Application Metadata
/// The name of the application.
pub const APP_NAME: &str = "calmly";
/// The description of the application used in CLI help text.
pub const APP_DESCRIPTION: &str = "A mental wellness chat companion with mood tracking";

// CLI Arguments & Defaults
/// Log format identifier for plain text.
pub const LOG_FORMAT_TEXT: &str = "text";
/// Log format identifier for JSON.
pub const LOG_FORMAT_JSON: &str = "json";
/// Default log level.
pub const DEFAULT_LOG_LEVEL: &str = "warn";

// Configuration Keys & Environment Variables
/// Environment variable for specifying the data directory.
pub const ENV_VAR_CALMLY_DIR: &str = "CALMLY_DIR";
/// Environment variable selecting the language-model provider.
pub const ENV_VAR_CALMLY_PROVIDER: &str = "CALMLY_PROVIDER";
/// Environment variable for the Ollama base URL.
pub const ENV_VAR_CALMLY_OLLAMA_URL: &str = "CALMLY_OLLAMA_URL";
/// Environment variable for the Gemini base URL.
pub const ENV_VAR_CALMLY_GEMINI_URL: &str = "CALMLY_GEMINI_URL";
/// Environment variable for the chat model name.
pub const ENV_VAR_CALMLY_MODEL: &str = "CALMLY_MODEL";
/// Environment variable for the model call timeout in seconds.
pub const ENV_VAR_CALMLY_TIMEOUT_SECS: &str = "CALMLY_TIMEOUT_SECS";
/// Environment variable holding the Google Generative Language API key.
pub const ENV_VAR_GOOGLE_API_KEY: &str = "GOOGLE_API_KEY";
/// Standard environment variable for the user's home directory.
pub const ENV_VAR_HOME: &str = "HOME";
/// Default sub-directory for persisted state within the user's home directory.
pub const DEFAULT_DATA_SUBDIR: &str = ".local/share/calmly";

// AI
/// Default Ollama API endpoint.
pub const DEFAULT_OLLAMA_URL: &str = "http://127.0.0.1:11434";
/// Default Gemini API endpoint.
pub const DEFAULT_GEMINI_URL: &str = "https://generativelanguage.googleapis.com";
/// Default chat model when talking to Ollama.
pub const DEFAULT_OLLAMA_MODEL: &str = "llama3.2:3b";
/// Default chat model when talking to Gemini.
pub const DEFAULT_GEMINI_MODEL: &str = "gemini-1.5-flash";
/// Default bound on a single model call.
pub const DEFAULT_TIMEOUT_SECS: u64 = 15;
/// Largest accepted model call timeout.
pub const MAX_TIMEOUT_SECS: u64 = 120;
/// Sampling temperature sent with Gemini requests.
pub const GEMINI_TEMPERATURE: f32 = 0.7;
/// Output token cap sent with Gemini requests.
pub const GEMINI_MAX_OUTPUT_TOKENS: u32 = 800;
/// Number of most recent user turns included in a prompt.
pub const PROMPT_USER_TURNS: usize = 3;
/// Number of chat turns retained by an interactive session.
pub const MAX_SESSION_TURNS: usize = 20;

// Storage
/// Storage key of the mood history blob.
pub const MOOD_STORAGE_KEY: &str = "moodTracking";
/// Storage key of the exercise store blob.
pub const EXERCISE_STORAGE_KEY: &str = "mental-health-exercises";
/// Snapshot format version written by the exercise store.
pub const EXERCISE_STORE_VERSION: u32 = 0;
/// File extension for persisted blobs.
pub const BLOB_FILE_EXTENSION: &str = "json";
/// Name of the lock file guarding blob writes.
pub const LOCK_FILE_NAME: &str = ".lock";
/// Default POSIX permissions for newly created directories (owner read/write/execute).
#[cfg(unix)]
pub const DEFAULT_DIR_PERMISSIONS: u32 = 0o700;
/// Default POSIX permissions for newly created files (owner read/write).
#[cfg(unix)]
pub const DEFAULT_FILE_PERMISSIONS: u32 = 0o600;

// Mood Tracking
/// Maximum number of mood entries retained.
pub const MOOD_HISTORY_LIMIT: usize = 14;
/// Number of days synthesized when no history exists.
pub const SAMPLE_MOOD_DAYS: i64 = 7;
/// Lowest synthesized sample mood value.
pub const SAMPLE_MOOD_MIN: u8 = 3;
/// Highest synthesized sample mood value.
pub const SAMPLE_MOOD_MAX: u8 = 5;
/// Minimum half-over-half mean difference that counts as a trend.
pub const TREND_THRESHOLD: f64 = 0.3;
/// Date format string for ISO date format (YYYY-MM-DD).
pub const DATE_FORMAT_ISO: &str = "%Y-%m-%d";

// Recommendations
/// Lowest exercise priority.
pub const MIN_EXERCISE_PRIORITY: u8 = 1;
/// Highest exercise priority.
pub const MAX_EXERCISE_PRIORITY: u8 = 5;
/// Maximum number of exercises produced by mood-based matching.
pub const MAX_RECOMMENDATIONS: usize = 3;
/// Prefix of ids minted for one-shot recommended exercises.
pub const RECOMMENDED_ID_PREFIX: &str = "rec-";
