//! OpenAI-compatible chat completion client.
//!
//! Speaks the `/chat/completions` wire format, so it works against
//! OpenAI itself or any compatible gateway via `OPENAI_BASE_URL`. One
//! request in, one classified outcome out; retry policy belongs to the
//! caller (currently: none).

use std::fmt;
use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use super::{ChatModel, ChatRequest, ModelError, classify_provider_status, classify_transport_error};

/// [`ChatModel`] implementation backed by an OpenAI-compatible HTTP API.
pub struct OpenAiChatModel {
    client: reqwest::Client,
    api_key: String,
    base_url: String,
}

impl OpenAiChatModel {
    /// Creates a client for the given API key and base URL.
    ///
    /// The timeout bounds the entire provider call, including response
    /// body download. A trailing slash on `base_url` is tolerated.
    ///
    /// # Errors
    ///
    /// Returns [`ModelError::Transport`] when the underlying HTTP client
    /// cannot be constructed.
    pub fn new(api_key: String, base_url: &str, timeout: Duration) -> Result<Self, ModelError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ModelError::Transport(e.to_string()))?;
        Ok(Self {
            client,
            api_key,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }
}

impl fmt::Debug for OpenAiChatModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OpenAiChatModel")
            .field("base_url", &self.base_url)
            .field("api_key", &"<redacted>")
            .finish_non_exhaustive()
    }
}

/// Chat completion request wire format.
#[derive(Debug, Serialize)]
struct CompletionBody<'a> {
    model: &'a str,
    messages: Vec<WireMessage<'a>>,
    temperature: f32,
    #[serde(skip_serializing_if = "Option::is_none")]
    response_format: Option<ResponseFormat>,
}

#[derive(Debug, Serialize)]
struct WireMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Debug, Serialize)]
struct ResponseFormat {
    #[serde(rename = "type")]
    kind: &'static str,
}

/// Chat completion response wire format. Only the fields we read.
#[derive(Debug, Deserialize)]
struct Completion {
    choices: Vec<CompletionChoice>,
}

#[derive(Debug, Deserialize)]
struct CompletionChoice {
    message: CompletionMessage,
}

#[derive(Debug, Deserialize)]
struct CompletionMessage {
    content: Option<String>,
}

#[async_trait]
impl ChatModel for OpenAiChatModel {
    async fn complete(&self, request: ChatRequest) -> Result<String, ModelError> {
        let body = CompletionBody {
            model: &request.model,
            messages: vec![
                WireMessage {
                    role: "system",
                    content: &request.system_prompt,
                },
                WireMessage {
                    role: "user",
                    content: &request.user_prompt,
                },
            ],
            temperature: request.temperature,
            response_format: request
                .json_response
                .then_some(ResponseFormat { kind: "json_object" }),
        };

        let url = format!("{}/chat/completions", self.base_url);
        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| classify_transport_error(&e))?;

        let status = response.status().as_u16();
        let text = response
            .text()
            .await
            .map_err(|e| classify_transport_error(&e))?;

        if !(200..300).contains(&status) {
            return Err(classify_provider_status(status, extract_error_message(&text)));
        }

        let completion: Completion =
            serde_json::from_str(&text).map_err(|e| ModelError::InvalidResponse(e.to_string()))?;
        completion
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .filter(|content| !content.trim().is_empty())
            .ok_or(ModelError::EmptyCompletion)
    }
}

/// Pulls a human-readable message out of a provider error body.
///
/// Providers disagree on the envelope: `{"error": {"message": ...}}`,
/// `{"message": ...}`, `{"detail": ...}`, or a bare string body. The raw
/// body is the last resort.
fn extract_error_message(body: &str) -> String {
    let Ok(value) = serde_json::from_str::<serde_json::Value>(body) else {
        return body.trim().to_string();
    };
    let candidates = [
        value.get("error").and_then(|e| e.get("message")),
        value.get("message"),
        value.get("detail"),
    ];
    for candidate in candidates {
        if let Some(message) = candidate.and_then(serde_json::Value::as_str) {
            return message.to_string();
        }
    }
    body.trim().to_string()
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;

    #[test]
    fn extracts_nested_error_message() {
        let body = r#"{"error": {"message": "Incorrect API key provided.", "type": "invalid_request_error"}}"#;
        assert_eq!(extract_error_message(body), "Incorrect API key provided.");
    }

    #[test]
    fn extracts_flat_message() {
        assert_eq!(
            extract_error_message(r#"{"message": "upstream timeout"}"#),
            "upstream timeout"
        );
    }

    #[test]
    fn extracts_detail_field() {
        assert_eq!(
            extract_error_message(r#"{"detail": "model overloaded"}"#),
            "model overloaded"
        );
    }

    #[test]
    fn falls_back_to_raw_body() {
        assert_eq!(extract_error_message("Bad Gateway\n"), "Bad Gateway");
        assert_eq!(extract_error_message(r#"{"code": 17}"#), r#"{"code": 17}"#);
    }

    #[test]
    fn json_response_flag_controls_response_format() {
        let with = CompletionBody {
            model: "gpt-4o",
            messages: vec![],
            temperature: 0.7,
            response_format: Some(ResponseFormat {
                kind: "json_object",
            }),
        };
        let Ok(json) = serde_json::to_string(&with) else {
            panic!("serialization failed");
        };
        assert!(json.contains(r#""response_format":{"type":"json_object"}"#));

        let without = CompletionBody {
            model: "gpt-4o",
            messages: vec![],
            temperature: 0.7,
            response_format: None,
        };
        let Ok(json) = serde_json::to_string(&without) else {
            panic!("serialization failed");
        };
        assert!(!json.contains("response_format"));
    }

    #[test]
    fn missing_content_decodes_to_none() {
        let body = r#"{"choices": [{"message": {"role": "assistant", "content": null}}]}"#;
        let Ok(completion) = serde_json::from_str::<Completion>(body) else {
            panic!("decode failed");
        };
        let content = completion
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content);
        assert_eq!(content, None);
    }
}
