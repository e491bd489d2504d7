//! Itinerary refinement endpoint.

use axum::extract::State;
use axum::extract::rejection::JsonRejection;
use axum::response::IntoResponse;
use axum::routing::post;
use axum::{Json, Router};

use crate::api::dto::{RefineRequest, RefineResponse};
use crate::app_state::AppState;
use crate::auth::CurrentUser;
use crate::domain::TripId;
use crate::error::{ApiError, ErrorResponse};

/// `POST /api/refine` — Apply a free-text edit to a saved trip's itinerary.
///
/// # Errors
///
/// Returns [`ApiError::InvalidInput`] when the body is incomplete,
/// [`ApiError::NotFoundOrForbidden`] when the trip is absent or foreign,
/// [`ApiError::UnclearInput`] when the edit request cannot be understood,
/// and the mapped [`ApiError`] when the model call fails. A failed save
/// is not an error: the 200 response then carries `saveError`.
#[utoipa::path(
    post,
    path = "/api/refine",
    tag = "Itineraries",
    summary = "Refine a trip's itinerary",
    description = "Applies the free-text `message` to the client's `currentItinerary` snapshot via the model, overwrites the trip's stored itinerary, and appends the previous version to its history.",
    request_body = RefineRequest,
    responses(
        (status = 200, description = "Itinerary refined; degraded saves carry saveError", body = RefineResponse),
        (status = 400, description = "Incomplete body or unclear edit request", body = ErrorResponse),
        (status = 401, description = "Not authenticated", body = ErrorResponse),
        (status = 404, description = "Trip not found or not owned", body = ErrorResponse),
        (status = 429, description = "Model provider throttling or quota exhausted", body = ErrorResponse),
        (status = 502, description = "Model returned an unusable response", body = ErrorResponse),
        (status = 503, description = "Model provider unavailable", body = ErrorResponse),
    ),
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn refine_itinerary(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    payload: Result<Json<RefineRequest>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let body = payload.map(|Json(body)| body).unwrap_or_default();
    let (trip_id, message, current_itinerary) = parse_refine_request(body)?;

    let outcome = state
        .trip_service
        .refine(user.id, trip_id, &message, &current_itinerary)
        .await?;

    Ok(Json(RefineResponse {
        itinerary: outcome.itinerary,
        itinerary_id: outcome.trip_id,
        updated_at: outcome.updated_at,
        save_error: outcome.save_error,
    }))
}

/// Refinement routes.
pub fn routes() -> Router<AppState> {
    Router::new().route("/refine", post(refine_itinerary))
}

// ── Request Parsing ─────────────────────────────────────────────────────

/// Requires trip id, message, and itinerary snapshot all present.
fn parse_refine_request(
    body: RefineRequest,
) -> Result<(TripId, String, serde_json::Value), ApiError> {
    const PRESENCE_MESSAGE: &str = "Please provide trip ID, message, and current itinerary.";

    let trip_id_raw = body.trip_id.as_deref().map(str::trim).unwrap_or_default();
    let message = body.message.as_deref().map(str::trim).unwrap_or_default();
    let current_itinerary = body.current_itinerary.filter(|value| !value.is_null());

    if trip_id_raw.is_empty() || message.is_empty() {
        return Err(ApiError::InvalidInput(PRESENCE_MESSAGE.to_string()));
    }
    let Some(current_itinerary) = current_itinerary else {
        return Err(ApiError::InvalidInput(PRESENCE_MESSAGE.to_string()));
    };

    // A malformed trip id behaves like a missing trip, not a validation
    // error, so well-formedness of ids is never leaked.
    let trip_id = trip_id_raw
        .parse::<TripId>()
        .map_err(|_| ApiError::NotFoundOrForbidden)?;

    Ok((trip_id, message.to_string(), current_itinerary))
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;

    fn full_body() -> RefineRequest {
        RefineRequest {
            trip_id: Some(TripId::new().to_string()),
            message: Some("add a beach day".to_string()),
            current_itinerary: Some(serde_json::json!({"tripName": "Rome", "days": []})),
        }
    }

    #[test]
    fn complete_body_parses() {
        let (_, message, snapshot) = match parse_refine_request(full_body()) {
            Ok(parsed) => parsed,
            Err(err) => panic!("parse failed: {err}"),
        };
        assert_eq!(message, "add a beach day");
        assert_eq!(
            snapshot.get("tripName").and_then(|name| name.as_str()),
            Some("Rome")
        );
    }

    #[test]
    fn each_missing_field_is_rejected_with_the_presence_message() {
        let expect_presence = |body: RefineRequest| {
            let Err(ApiError::InvalidInput(message)) = parse_refine_request(body) else {
                panic!("expected InvalidInput");
            };
            assert_eq!(
                message,
                "Please provide trip ID, message, and current itinerary."
            );
        };

        let mut body = full_body();
        body.trip_id = None;
        expect_presence(body);

        let mut body = full_body();
        body.message = Some("   ".to_string());
        expect_presence(body);

        let mut body = full_body();
        body.current_itinerary = None;
        expect_presence(body);

        let mut body = full_body();
        body.current_itinerary = Some(serde_json::Value::Null);
        expect_presence(body);
    }

    #[test]
    fn malformed_trip_id_reads_as_not_found() {
        let mut body = full_body();
        body.trip_id = Some("definitely-not-a-uuid".to_string());
        assert!(matches!(
            parse_refine_request(body),
            Err(ApiError::NotFoundOrForbidden)
        ));
    }
}
