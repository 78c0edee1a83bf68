/*!
# Calmly

Calmly is a command-line mental wellness companion. It holds a supportive
conversation through a language model, keeps a short daily mood history
derived from each conversation, and recommends self-help exercises that fit
how the user has been feeling.

## Core Features

- Chat with a local Ollama model or Google Gemini, with a bounded wait and
  canned replies whenever the model is unavailable
- Keyword-based mood scoring of each turn's analysis into a 14-day history
- Mood summaries: average, trend, best and worst days
- An exercise catalog with mood-driven recommendations and completion tracking

## Architecture

- `cli`: Command-line interface handling using clap
- `config`: Configuration loading and validation
- `errors`: Error handling infrastructure
- `storage`: Key/value blob persistence on disk or in memory
- `mood`: Mood scoring and the persisted mood history
- `exercises`: Exercise records, the built-in catalog, and matching
- `store`: The persisted exercise store
- `ai`: Language-model clients, prompts, and reply parsing
- `ops`: The chat pipeline and mood insights

## Usage Example

```rust,no_run
use calmly::mood::MoodTracker;
use calmly::ops::summarize;
use calmly::storage::FileStorage;
use calmly::Config;

fn main() -> calmly::AppResult<()> {
    let config = Config::load()?;
    config.validate()?;

    let storage = FileStorage::new(&config.data_dir);
    let history = MoodTracker::new(&storage).load(chrono::Local::now().date_naive());
    if let Some(summary) = summarize(&history) {
        println!("Average mood: {} ({})", summary.average, summary.description);
    }
    Ok(())
}
```
*/

/// Language-model clients and reply handling
pub mod ai;
/// Command-line interface for parsing and handling user arguments
pub mod cli;
/// Configuration loading and management
pub mod config;
pub mod constants;
/// Error types and utilities for error handling
pub mod errors;
/// Exercise records, catalog, and matching
pub mod exercises;
/// Mood scoring and history
pub mod mood;
/// High-level operations behind the CLI commands
pub mod ops;
/// Blob persistence
pub mod storage;
/// The persisted exercise store
pub mod store;

// Re-export important types for convenience
pub use cli::CliArgs;
pub use config::Config;
pub use errors::{AppError, AppResult};
