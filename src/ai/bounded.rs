//! A language-model call with a deadline and a cancellation token.

use super::{AIResult, ChatModel, Message};
use crate::errors::AIError;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

/// Runs `model.chat(messages)` until it finishes, `timeout` elapses, or
/// `token` is cancelled, whichever comes first.
///
/// A timeout cancels `token` so anything else tied to this call stops too.
/// The losing branches are dropped, which aborts an in-flight request and
/// discards a late result.
///
/// # Errors
///
/// Returns [`AIError::Timeout`] or [`AIError::Cancelled`] when the call did
/// not win, otherwise whatever the model returned.
pub async fn bounded_chat(
    model: &dyn ChatModel,
    messages: &[Message],
    timeout: Duration,
    token: &CancellationToken,
) -> AIResult<String> {
    if token.is_cancelled() {
        return Err(AIError::Cancelled);
    }

    tokio::select! {
        biased;
        _ = token.cancelled() => {
            debug!("Chat call to {} cancelled", model.model_name());
            Err(AIError::Cancelled)
        }
        _ = tokio::time::sleep(timeout) => {
            warn!("Chat call to {} timed out after {:?}", model.model_name(), timeout);
            token.cancel();
            Err(AIError::Timeout(timeout))
        }
        result = model.chat(messages) => result,
    }
}
