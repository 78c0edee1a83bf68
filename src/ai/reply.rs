//! Parsing the two-part model reply.

use super::AIResult;
use crate::errors::AIError;

const ANALYSIS_MARKER: &str = "ANALYSIS:";
const RESPONSE_MARKER: &str = "RESPONSE:";

/// The model's assessment of the user's state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Analysis {
    Available(String),
    /// The model did not follow the format, or no call was made.
    Unavailable,
}

impl Analysis {
    /// The analysis text, if there is one.
    pub fn text(&self) -> Option<&str> {
        match self {
            Analysis::Available(text) => Some(text),
            Analysis::Unavailable => None,
        }
    }
}

/// A parsed model reply.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModelReply {
    pub analysis: Analysis,
    /// The text shown to the user.
    pub response: String,
}

/// Splits a reply of the form `ANALYSIS: ... RESPONSE: ...`.
///
/// The analysis is the text between the first `ANALYSIS:` and the next
/// `RESPONSE:`. The response is everything after the first `RESPONSE:`. When
/// the response section is missing or blank the whole reply is used instead.
///
/// # Errors
///
/// Returns [`AIError::InvalidResponse`] when the reply has no usable text.
///
/// # Examples
///
/// ```
/// use calmly::ai::{parse_reply, Analysis};
///
/// let reply = parse_reply("ANALYSIS: mild stress\nRESPONSE: Take a breath.").unwrap();
/// assert_eq!(reply.analysis, Analysis::Available("mild stress".to_string()));
/// assert_eq!(reply.response, "Take a breath.");
///
/// let reply = parse_reply("Just a plain answer").unwrap();
/// assert_eq!(reply.analysis, Analysis::Unavailable);
/// assert_eq!(reply.response, "Just a plain answer");
/// ```
pub fn parse_reply(text: &str) -> AIResult<ModelReply> {
    let analysis = text
        .find(ANALYSIS_MARKER)
        .map(|start| &text[start + ANALYSIS_MARKER.len()..])
        .and_then(|rest| rest.find(RESPONSE_MARKER).map(|end| rest[..end].trim()))
        .filter(|analysis| !analysis.is_empty())
        .map_or(Analysis::Unavailable, |a| Analysis::Available(a.to_string()));

    let response = text
        .find(RESPONSE_MARKER)
        .map(|start| text[start + RESPONSE_MARKER.len()..].trim())
        .filter(|response| !response.is_empty())
        .unwrap_or_else(|| text.trim());

    if response.is_empty() {
        return Err(AIError::InvalidResponse(
            "Model returned an empty reply".to_string(),
        ));
    }

    Ok(ModelReply {
        analysis,
        response: response.to_string(),
    })
}
