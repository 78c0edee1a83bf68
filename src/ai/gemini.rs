//! Google Gemini client for chat completion.
//!
//! System messages become the request's `systemInstruction`; user turns keep
//! the `user` role and assistant turns are sent as `model`.

use super::{AIResult, ChatModel, Message};
use crate::constants::{ENV_VAR_GOOGLE_API_KEY, GEMINI_MAX_OUTPUT_TOKENS, GEMINI_TEMPERATURE};
use crate::errors::AIError;
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateRequest {
    contents: Vec<Content>,
    #[serde(skip_serializing_if = "Option::is_none")]
    system_instruction: Option<Content>,
    generation_config: GenerationConfig,
}

#[derive(Debug, Serialize)]
struct Content {
    #[serde(skip_serializing_if = "Option::is_none")]
    role: Option<&'static str>,
    parts: Vec<Part>,
}

#[derive(Debug, Serialize)]
struct Part {
    text: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    temperature: f32,
    max_output_tokens: u32,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<CandidatePart>,
}

#[derive(Debug, Deserialize)]
struct CandidatePart {
    #[serde(default)]
    text: Option<String>,
}

impl GenerateRequest {
    fn from_messages(messages: &[Message]) -> Self {
        let mut system = Vec::new();
        let mut contents = Vec::new();

        for message in messages {
            let part = Part {
                text: message.content.clone(),
            };
            match message.role.as_str() {
                "system" => system.push(part),
                "assistant" => contents.push(Content {
                    role: Some("model"),
                    parts: vec![part],
                }),
                _ => contents.push(Content {
                    role: Some("user"),
                    parts: vec![part],
                }),
            }
        }

        Self {
            contents,
            system_instruction: (!system.is_empty()).then_some(Content {
                role: None,
                parts: system,
            }),
            generation_config: GenerationConfig {
                temperature: GEMINI_TEMPERATURE,
                max_output_tokens: GEMINI_MAX_OUTPUT_TOKENS,
            },
        }
    }
}

/// Client for the Gemini `generateContent` endpoint.
pub struct GeminiClient {
    base_url: String,
    model: String,
    api_key: Option<String>,
    client: Client,
}

impl GeminiClient {
    /// Creates a new Gemini client.
    ///
    /// A missing `api_key` is not an error here; every call then fails with
    /// [`AIError::MissingCredentials`] without touching the network.
    pub fn new(
        base_url: impl Into<String>,
        model: impl Into<String>,
        api_key: Option<String>,
    ) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            model: model.into(),
            api_key,
            client: Client::new(),
        }
    }
}

#[async_trait]
impl ChatModel for GeminiClient {
    async fn chat(&self, messages: &[Message]) -> AIResult<String> {
        let api_key = self
            .api_key
            .as_deref()
            .ok_or_else(|| AIError::MissingCredentials(ENV_VAR_GOOGLE_API_KEY.to_string()))?;

        debug!("Sending generateContent request with model: {}", self.model);

        let url = format!(
            "{}/v1beta/models/{}:generateContent",
            self.base_url, self.model
        );
        let response = self
            .client
            .post(&url)
            .query(&[("key", api_key)])
            .json(&GenerateRequest::from_messages(messages))
            .send()
            .await
            .map_err(AIError::Offline)?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();

            if status.as_u16() == 404 {
                return Err(AIError::ModelNotFound(self.model.clone()));
            }

            return Err(AIError::InvalidResponse(format!(
                "HTTP {}: {}",
                status, error_text
            )));
        }

        let body: GenerateResponse = response.json().await.map_err(|e| {
            AIError::InvalidResponse(format!("Failed to parse generateContent response: {}", e))
        })?;

        let text: String = body
            .candidates
            .into_iter()
            .next()
            .and_then(|c| c.content)
            .map(|content| {
                content
                    .parts
                    .into_iter()
                    .filter_map(|p| p.text)
                    .collect()
            })
            .ok_or_else(|| AIError::InvalidResponse("Response had no candidates".to_string()))?;

        debug!("Received generateContent response");
        Ok(text)
    }

    fn model_name(&self) -> &str {
        &self.model
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::Matcher;
    use serde_json::json;

    #[test]
    fn test_request_layout() {
        let request = GenerateRequest::from_messages(&[
            Message::system("Be kind"),
            Message::user("Hi"),
            Message::assistant("Hello"),
        ]);
        let value = serde_json::to_value(&request).unwrap();

        assert_eq!(value["systemInstruction"]["parts"][0]["text"], "Be kind");
        assert!(value["systemInstruction"].get("role").is_none());
        assert_eq!(value["contents"][0]["role"], "user");
        assert_eq!(value["contents"][1]["role"], "model");
        assert_eq!(value["generationConfig"]["maxOutputTokens"], 800);
    }

    #[tokio::test]
    async fn test_missing_key_fails_before_request() {
        let client = GeminiClient::new("http://127.0.0.1:9", "gemini-1.5-flash", None);
        let err = client.chat(&[Message::user("Hi")]).await.unwrap_err();
        assert!(matches!(err, AIError::MissingCredentials(ref v) if v == "GOOGLE_API_KEY"));
    }

    #[tokio::test]
    async fn test_chat_success_joins_parts() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/v1beta/models/gemini-1.5-flash:generateContent")
            .match_query(Matcher::UrlEncoded("key".into(), "test-key".into()))
            .match_body(Matcher::PartialJson(json!({
                "contents": [{"role": "user", "parts": [{"text": "Hi"}]}]
            })))
            .with_status(200)
            .with_body(
                json!({
                    "candidates": [{
                        "content": {"role": "model", "parts": [{"text": "ANALYSIS: calm "}, {"text": "RESPONSE: Hello"}]}
                    }]
                })
                .to_string(),
            )
            .create_async()
            .await;

        let client = GeminiClient::new(
            server.url(),
            "gemini-1.5-flash",
            Some("test-key".to_string()),
        );
        let reply = client.chat(&[Message::user("Hi")]).await.unwrap();

        assert_eq!(reply, "ANALYSIS: calm RESPONSE: Hello");
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_no_candidates_is_invalid() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("POST", "/v1beta/models/gemini-1.5-flash:generateContent")
            .match_query(Matcher::Any)
            .with_status(200)
            .with_body(r#"{"candidates": []}"#)
            .create_async()
            .await;

        let client = GeminiClient::new(server.url(), "gemini-1.5-flash", Some("k".to_string()));
        let err = client.chat(&[Message::user("Hi")]).await.unwrap_err();
        assert!(matches!(err, AIError::InvalidResponse(_)));
    }

    #[tokio::test]
    async fn test_rejected_key_is_invalid_response() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("POST", "/v1beta/models/gemini-1.5-flash:generateContent")
            .match_query(Matcher::Any)
            .with_status(400)
            .with_body(r#"{"error": {"message": "API key not valid"}}"#)
            .create_async()
            .await;

        let client = GeminiClient::new(server.url(), "gemini-1.5-flash", Some("bad".to_string()));
        let err = client.chat(&[Message::user("Hi")]).await.unwrap_err();
        assert!(matches!(err, AIError::InvalidResponse(ref m) if m.contains("400")));
    }
}
