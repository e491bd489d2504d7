//! API error types with HTTP status code mapping.
//!
//! [`ApiError`] is the central error type for the service. Each variant
//! carries user-facing copy and maps to a specific HTTP status code; the
//! JSON body is a flat object so browser clients can read `error`
//! directly. Provider and store failures convert into these variants at
//! the orchestration boundary.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use utoipa::ToSchema;

use crate::llm::ModelError;
use crate::persistence::StoreError;

/// Structured JSON error response body.
///
/// All error responses follow this shape:
/// ```json
/// {
///   "error": "I didn't understand your request. Please try rephrasing it.",
///   "unclearInput": true
/// }
/// ```
///
/// `unclearInput` is present only when the request text itself could not
/// be understood, so clients can prompt the user to rephrase rather than
/// retry.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ErrorResponse {
    /// Human-readable error message.
    pub error: String,
    /// Set to `true` when the user's free-text input was not understood.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub unclear_input: Option<bool>,
}

/// Server-side error enum with HTTP status code mapping.
///
/// | Variant                    | HTTP Status              |
/// |----------------------------|--------------------------|
/// | `InvalidInput`             | 400 Bad Request          |
/// | `UnclearInput`             | 400 Bad Request          |
/// | `Unauthorized`             | 401 Unauthorized         |
/// | `NotFoundOrForbidden`      | 404 Not Found            |
/// | `RateLimited`              | 429 Too Many Requests    |
/// | `MalformedUpstreamResponse`| 502 Bad Gateway          |
/// | `UpstreamUnavailable`      | 503 / 504 (passthrough)  |
/// | `UpstreamAuthFailure`      | 500 Internal Server Error|
/// | `Internal`                 | 500 Internal Server Error|
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// Request validation failed; the message tells the caller what to fix.
    #[error("{0}")]
    InvalidInput(String),

    /// The user's free-text request could not be understood, either by the
    /// heuristic pre-filter or by the model itself.
    #[error("{0}")]
    UnclearInput(String),

    /// No valid session, or the session's user no longer exists.
    #[error("{0}")]
    Unauthorized(String),

    /// The trip does not exist or belongs to another user. The two cases
    /// are deliberately indistinguishable to the caller.
    #[error("Trip not found or access denied.")]
    NotFoundOrForbidden,

    /// The model provider refused the request due to throttling or an
    /// exhausted quota.
    #[error("{}", match .quota {
        true => "The AI service quota has been exhausted. Please check your plan and billing details, or try again later.",
        false => "We're receiving too many requests right now. Please wait a moment and try again.",
    })]
    RateLimited {
        /// True when the provider reported a billing/quota problem rather
        /// than transient throttling.
        quota: bool,
    },

    /// The model provider answered but the content was empty or unusable.
    #[error("The AI service returned an unexpected response. Please try again.")]
    MalformedUpstreamResponse,

    /// The model provider is down or timing out.
    #[error("The AI service is temporarily unavailable. Please try again in a moment.")]
    UpstreamUnavailable {
        /// Provider status code, passed through to the caller (503 or 504).
        status: u16,
    },

    /// The model provider rejected our credentials. Not actionable by the
    /// caller.
    #[error("The AI service rejected our credentials. Please contact support.")]
    UpstreamAuthFailure,

    /// Anything unclassified. The payload is logged server-side and never
    /// shown to the caller.
    #[error("We couldn't process your request right now. Please try again.")]
    Internal(String),
}

impl ApiError {
    /// Returns the HTTP status code for this variant.
    #[must_use]
    pub const fn status_code(&self) -> StatusCode {
        match self {
            Self::InvalidInput(_) | Self::UnclearInput(_) => StatusCode::BAD_REQUEST,
            Self::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            Self::NotFoundOrForbidden => StatusCode::NOT_FOUND,
            Self::RateLimited { .. } => StatusCode::TOO_MANY_REQUESTS,
            Self::MalformedUpstreamResponse => StatusCode::BAD_GATEWAY,
            Self::UpstreamUnavailable { status } => match *status {
                504 => StatusCode::GATEWAY_TIMEOUT,
                _ => StatusCode::SERVICE_UNAVAILABLE,
            },
            Self::UpstreamAuthFailure | Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<ModelError> for ApiError {
    fn from(err: ModelError) -> Self {
        match err {
            ModelError::QuotaExhausted { .. } => Self::RateLimited { quota: true },
            ModelError::TooManyRequests { .. } => Self::RateLimited { quota: false },
            ModelError::Unavailable { status } => Self::UpstreamUnavailable { status },
            ModelError::AuthFailed { .. } => Self::UpstreamAuthFailure,
            ModelError::EmptyCompletion | ModelError::InvalidResponse(_) => {
                Self::MalformedUpstreamResponse
            }
            other @ (ModelError::Transport(_) | ModelError::Api { .. }) => {
                Self::Internal(other.to_string())
            }
        }
    }
}

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        Self::Internal(err.to_string())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match &self {
            Self::Internal(detail) => tracing::error!(detail = %detail, "internal error"),
            Self::UpstreamAuthFailure => {
                tracing::error!("model provider rejected credentials");
            }
            _ => {}
        }
        let status = self.status_code();
        let body = ErrorResponse {
            error: self.to_string(),
            unclear_input: matches!(self, Self::UnclearInput(_)).then_some(true),
        };
        let mut response = axum::Json(body).into_response();
        *response.status_mut() = status;
        response
    }
}
