//! High-level operations behind the CLI commands.
//!
//! - `chat`: one supportive chat turn and the interactive conversation
//! - `insights`: mood summaries and mood-driven exercise recommendations

pub mod chat;
pub mod insights;

// Re-export commonly used functions
pub use chat::{
    analyze_and_respond, listen_for_interrupts, read_lines_in_background, start_conversation,
    ChatOutcome, ChatSession, Fallback, InputLines, Interrupts,
};
pub use insights::{mood_advice, refresh_recommendations, summarize, MoodSummary};
