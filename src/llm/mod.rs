//! Model provider abstraction: chat requests, error classification, and
//! the OpenAI-compatible client.
//!
//! The service talks to the model provider through the [`ChatModel`]
//! trait so the orchestration layer can be tested against scripted
//! models. Provider failures are classified into [`ModelError`] variants
//! at this boundary; nothing above it inspects provider status codes or
//! error bodies.

pub mod openai;
pub mod prompts;

pub use openai::OpenAiChatModel;

use async_trait::async_trait;

/// Sampling temperature used for every generation and refinement call.
pub const SAMPLING_TEMPERATURE: f32 = 0.7;

/// A single chat completion request.
///
/// Carries everything the provider call needs: which model to use, the
/// two prompt halves, the sampling temperature, and whether to ask the
/// provider for strict JSON output.
#[derive(Debug, Clone)]
pub struct ChatRequest {
    /// Provider model name, e.g. `gpt-4o`.
    pub model: String,
    /// System prompt setting role and output rules.
    pub system_prompt: String,
    /// User prompt carrying the request specifics.
    pub user_prompt: String,
    /// Sampling temperature.
    pub temperature: f32,
    /// Request the provider's JSON response format.
    pub json_response: bool,
}

/// Classified failure of a model provider call.
#[derive(Debug, thiserror::Error)]
pub enum ModelError {
    /// The provider reported an exhausted quota or billing problem.
    #[error("provider quota exhausted: {message}")]
    QuotaExhausted {
        /// Provider-supplied error message.
        message: String,
    },

    /// The provider is throttling requests.
    #[error("provider rate limited: {message}")]
    TooManyRequests {
        /// Provider-supplied error message.
        message: String,
    },

    /// The provider is down or timing out.
    #[error("provider unavailable (status {status})")]
    Unavailable {
        /// Provider HTTP status (503 or 504).
        status: u16,
    },

    /// The provider rejected our credentials.
    #[error("provider rejected credentials (status {status})")]
    AuthFailed {
        /// Provider HTTP status (401 or 403).
        status: u16,
    },

    /// The provider answered 2xx but the completion content was missing
    /// or empty.
    #[error("provider returned no completion content")]
    EmptyCompletion,

    /// The provider answered 2xx but the response envelope could not be
    /// decoded.
    #[error("failed to decode provider response: {0}")]
    InvalidResponse(String),

    /// The request never reached a response: connection, DNS, or TLS
    /// failure.
    #[error("provider request failed: {0}")]
    Transport(String),

    /// Any other provider error status.
    #[error("provider error (status {status}): {message}")]
    Api {
        /// Provider HTTP status.
        status: u16,
        /// Provider-supplied error message.
        message: String,
    },
}

/// A chat-completion model provider.
#[async_trait]
pub trait ChatModel: Send + Sync {
    /// Performs a single chat completion and returns the raw completion
    /// text. No retries are attempted; callers see exactly one outcome
    /// per call.
    ///
    /// # Errors
    ///
    /// Returns a classified [`ModelError`] when the provider cannot be
    /// reached, refuses the request, or answers without usable content.
    async fn complete(&self, request: ChatRequest) -> Result<String, ModelError>;
}

/// Classifies a non-2xx provider response.
///
/// Quota keywords take precedence over the status code: some providers
/// report billing exhaustion under generic statuses. After that, 429 maps
/// to throttling, 401/403 to credential failure, and 503/504 to
/// unavailability. Unrecognized statuses fall back to scanning the
/// message for throttling keywords before landing in [`ModelError::Api`].
#[must_use]
pub fn classify_provider_status(status: u16, message: String) -> ModelError {
    if is_quota_message(&message) {
        return ModelError::QuotaExhausted { message };
    }
    match status {
        429 => ModelError::TooManyRequests { message },
        401 | 403 => ModelError::AuthFailed { status },
        503 | 504 => ModelError::Unavailable { status },
        _ if is_throttle_message(&message) => ModelError::TooManyRequests { message },
        _ => ModelError::Api { status, message },
    }
}

/// Classifies a transport-level failure where no provider status exists.
///
/// Timeouts count as provider unavailability; everything else is scanned
/// for quota and throttling keywords before landing in
/// [`ModelError::Transport`].
#[must_use]
pub fn classify_transport_error(err: &reqwest::Error) -> ModelError {
    if err.is_timeout() {
        return ModelError::Unavailable { status: 504 };
    }
    let message = err.to_string();
    if is_quota_message(&message) {
        return ModelError::QuotaExhausted { message };
    }
    if is_throttle_message(&message) {
        return ModelError::TooManyRequests { message };
    }
    ModelError::Transport(message)
}

fn is_quota_message(message: &str) -> bool {
    let lower = message.to_lowercase();
    lower.contains("quota") || lower.contains("billing") || lower.contains("credit")
}

fn is_throttle_message(message: &str) -> bool {
    let lower = message.to_lowercase();
    lower.contains("rate limit") || lower.contains("too many requests")
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;

    #[test]
    fn quota_keywords_win_over_status() {
        let err = classify_provider_status(
            429,
            "You exceeded your current quota, please check your plan and billing details."
                .to_string(),
        );
        assert!(matches!(err, ModelError::QuotaExhausted { .. }));

        let err = classify_provider_status(500, "insufficient credit balance".to_string());
        assert!(matches!(err, ModelError::QuotaExhausted { .. }));
    }

    #[test]
    fn plain_429_is_throttling() {
        let err = classify_provider_status(429, "Please slow down.".to_string());
        assert!(matches!(err, ModelError::TooManyRequests { .. }));
    }

    #[test]
    fn auth_statuses_map_to_auth_failure() {
        for status in [401, 403] {
            let err = classify_provider_status(status, "Incorrect API key provided.".to_string());
            assert!(
                matches!(err, ModelError::AuthFailed { status: s } if s == status),
                "status {status} misclassified"
            );
        }
    }

    #[test]
    fn outage_statuses_map_to_unavailable() {
        for status in [503, 504] {
            let err = classify_provider_status(status, "upstream overloaded".to_string());
            assert!(
                matches!(err, ModelError::Unavailable { status: s } if s == status),
                "status {status} misclassified"
            );
        }
    }

    #[test]
    fn unknown_status_scans_message_for_throttling() {
        let err = classify_provider_status(500, "Rate limit reached for gpt-4o".to_string());
        assert!(matches!(err, ModelError::TooManyRequests { .. }));
    }

    #[test]
    fn unknown_status_without_keywords_is_api_error() {
        let err = classify_provider_status(500, "The server had an error.".to_string());
        let ModelError::Api { status, message } = err else {
            panic!("expected Api variant");
        };
        assert_eq!(status, 500);
        assert_eq!(message, "The server had an error.");
    }
}
