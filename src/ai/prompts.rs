//! System prompt and message builders for the chat pipeline.

use super::ollama::Message;
use crate::constants::PROMPT_USER_TURNS;

/// System prompt for the supportive chat turn.
///
/// The model is asked for a two-part reply so the analysis can drive mood
/// scoring and exercise selection while only the response is shown.
pub const SYSTEM_PROMPT: &str = r#"You are a supportive mental health companion. Your role is to:

1. Read what the user has shared with care and without judgment
2. Briefly assess their current mental state
3. Reply with warmth, encouragement, and practical support

Guidelines:
- Be empathetic and calm
- Mention signs of anxiety, depression, stress, or a positive mood when you notice them
- Keep the response short enough for a conversation
- Never diagnose; gently suggest professional help if the user seems at risk

Format your reply exactly as:
ANALYSIS: [brief analysis of the user's mental state, including any signs of anxiety, depression, stress, etc.]
RESPONSE: [supportive response to the user]"#;

/// Joins the contents of the last few user messages with newlines.
///
/// Returns `None` when the history has no user message with any text.
///
/// # Examples
///
/// ```
/// use calmly::ai::{recent_user_text, Message};
///
/// let history = vec![
///     Message::user("one"),
///     Message::assistant("ok"),
///     Message::user("two"),
///     Message::user("three"),
///     Message::user("four"),
/// ];
/// assert_eq!(recent_user_text(&history).unwrap(), "two\nthree\nfour");
/// assert!(recent_user_text(&[Message::assistant("hi")]).is_none());
/// ```
pub fn recent_user_text(history: &[Message]) -> Option<String> {
    let user_turns: Vec<&str> = history
        .iter()
        .filter(|m| m.is_user())
        .map(|m| m.content.as_str())
        .collect();
    let start = user_turns.len().saturating_sub(PROMPT_USER_TURNS);
    let joined = user_turns[start..].join("\n");

    if joined.trim().is_empty() {
        None
    } else {
        Some(joined)
    }
}

/// Builds the messages for analyzing and answering `user_text`.
pub fn analysis_prompt(user_text: &str) -> Vec<Message> {
    vec![
        Message::system(SYSTEM_PROMPT),
        Message::user(format!(
            r#"Analyze this message briefly and respond supportively:
"{}""#,
            user_text
        )),
    ]
}
