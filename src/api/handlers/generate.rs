//! Itinerary generation endpoint.

use axum::extract::State;
use axum::extract::rejection::JsonRejection;
use axum::response::IntoResponse;
use axum::routing::post;
use axum::{Json, Router};

use crate::api::dto::{GenerateRequest, GenerateResponse};
use crate::app_state::AppState;
use crate::auth::CurrentUser;
use crate::domain::{
    BudgetTier, GenerationMode, InterestProfile, Pace, TransportMode, TravelStyle, TripId,
    TripRequest,
};
use crate::error::{ApiError, ErrorResponse};

/// `POST /api/generate` — Generate an itinerary and save it as a trip.
///
/// # Errors
///
/// Returns [`ApiError::InvalidInput`] on a bad request shape and the
/// mapped [`ApiError`] when the model call or response validation fails.
/// A failed save is not an error: the 200 response then carries
/// `saveError` with null ids.
#[utoipa::path(
    post,
    path = "/api/generate",
    tag = "Itineraries",
    summary = "Generate a travel itinerary",
    description = "Generates a multi-day itinerary from the trip request and saves it as a new trip, or regenerates an existing trip in place when `tripId` is given. Accepts the interest-led form (`interests` plus modifiers) or the legacy form (`budget` tier).",
    request_body = GenerateRequest,
    responses(
        (status = 200, description = "Itinerary generated; degraded saves carry saveError with null ids", body = GenerateResponse),
        (status = 400, description = "Invalid request shape", body = ErrorResponse),
        (status = 401, description = "Not authenticated", body = ErrorResponse),
        (status = 404, description = "Trip to regenerate not found or not owned", body = ErrorResponse),
        (status = 429, description = "Model provider throttling or quota exhausted", body = ErrorResponse),
        (status = 502, description = "Model returned an unusable response", body = ErrorResponse),
        (status = 503, description = "Model provider unavailable", body = ErrorResponse),
    ),
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn generate_itinerary(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    payload: Result<Json<GenerateRequest>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    // An unreadable body falls through to the same validation errors as
    // an empty one.
    let body = payload.map(|Json(body)| body).unwrap_or_default();
    let (request, existing_trip) = parse_generate_request(body)?;

    let outcome = state
        .trip_service
        .generate(user.id, &request, existing_trip)
        .await?;

    Ok(Json(GenerateResponse {
        itinerary: outcome.itinerary,
        itinerary_id: outcome.trip_id,
        created_at: outcome.created_at,
        updated_at: outcome.updated_at,
        save_error: outcome.save_error,
    }))
}

/// Generation routes.
pub fn routes() -> Router<AppState> {
    Router::new().route("/generate", post(generate_itinerary))
}

// ── Request Parsing ─────────────────────────────────────────────────────

/// Validates the lenient request body into a [`TripRequest`] and an
/// optional trip id to regenerate.
///
/// The presence of `budget` selects the legacy form; otherwise the
/// interest-led form applies, with absent modifiers falling back to the
/// client defaults (Solo / Balanced / Walking).
fn parse_generate_request(
    body: GenerateRequest,
) -> Result<(TripRequest, Option<TripId>), ApiError> {
    let destination = body
        .destination
        .as_deref()
        .map(str::trim)
        .unwrap_or_default();
    let duration = body.duration.as_ref().and_then(parse_duration);
    let (Some(duration), false) = (duration, destination.is_empty()) else {
        return Err(ApiError::InvalidInput(
            "Please provide a destination and duration.".to_string(),
        ));
    };

    let mode = match body.budget.as_deref() {
        Some(tier) => GenerationMode::Budget(tier.trim().parse::<BudgetTier>().map_err(|_| {
            ApiError::InvalidInput("Please select a valid budget tier.".to_string())
        })?),
        None => {
            let interests = body.interests.as_deref().map(str::trim).unwrap_or_default();
            if interests.is_empty() {
                return Err(ApiError::InvalidInput(
                    "Please provide your interests.".to_string(),
                ));
            }
            GenerationMode::Interests(InterestProfile {
                interests: interests.to_string(),
                travel_style: parse_modifier(
                    body.travel_style.as_deref(),
                    TravelStyle::Solo,
                    "Please select a valid travel style.",
                )?,
                pace: parse_modifier(
                    body.pace.as_deref(),
                    Pace::Balanced,
                    "Please select a valid pace.",
                )?,
                transport: parse_modifier(
                    body.transport.as_deref(),
                    TransportMode::Walking,
                    "Please select a valid transport option.",
                )?,
                dietary_restrictions: body
                    .dietary_restrictions
                    .as_deref()
                    .map(str::trim)
                    .filter(|diet| !diet.is_empty())
                    .map(str::to_string),
            })
        }
    };

    // A malformed trip id behaves like a missing trip, not a validation
    // error, so well-formedness of ids is never leaked.
    let existing_trip = body
        .trip_id
        .as_deref()
        .map(str::trim)
        .filter(|id| !id.is_empty())
        .map(|id| id.parse::<TripId>().map_err(|_| ApiError::NotFoundOrForbidden))
        .transpose()?;

    Ok((
        TripRequest {
            destination: destination.to_string(),
            duration,
            mode,
        },
        existing_trip,
    ))
}

/// Reads the duration as a positive integer from either a JSON number or
/// a numeric string.
fn parse_duration(value: &serde_json::Value) -> Option<u32> {
    let duration = match value {
        serde_json::Value::Number(num) => num.as_u64(),
        serde_json::Value::String(raw) => raw.trim().parse::<u64>().ok(),
        _ => None,
    }?;
    u32::try_from(duration).ok().filter(|days| *days >= 1)
}

/// Parses an optional enum-like modifier, falling back to `default` when
/// the field is absent or blank.
fn parse_modifier<T: std::str::FromStr>(
    value: Option<&str>,
    default: T,
    message: &str,
) -> Result<T, ApiError> {
    match value.map(str::trim) {
        None | Some("") => Ok(default),
        Some(raw) => raw
            .parse()
            .map_err(|_| ApiError::InvalidInput(message.to_string())),
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;

    fn legacy_body(destination: &str, duration: serde_json::Value, budget: &str) -> GenerateRequest {
        GenerateRequest {
            destination: Some(destination.to_string()),
            duration: Some(duration),
            budget: Some(budget.to_string()),
            ..GenerateRequest::default()
        }
    }

    fn interest_body() -> GenerateRequest {
        GenerateRequest {
            destination: Some("Lisbon, Portugal".to_string()),
            duration: Some(serde_json::json!(4)),
            interests: Some("street art, seafood".to_string()),
            ..GenerateRequest::default()
        }
    }

    fn expect_invalid(result: Result<(TripRequest, Option<TripId>), ApiError>) -> String {
        match result {
            Err(ApiError::InvalidInput(message)) => message,
            Err(other) => panic!("expected InvalidInput, got {other:?}"),
            Ok(_) => panic!("expected InvalidInput, got Ok"),
        }
    }

    #[test]
    fn legacy_body_parses_into_budget_mode() {
        let (request, existing) = match parse_generate_request(legacy_body(
            "Paris, France",
            serde_json::json!(3),
            "Standard",
        )) {
            Ok(parsed) => parsed,
            Err(err) => panic!("parse failed: {err}"),
        };

        assert_eq!(request.destination, "Paris, France");
        assert_eq!(request.duration, 3);
        assert!(matches!(
            request.mode,
            GenerationMode::Budget(BudgetTier::Standard)
        ));
        assert!(existing.is_none());
    }

    #[test]
    fn missing_destination_or_duration_is_rejected() {
        let message = expect_invalid(parse_generate_request(GenerateRequest::default()));
        assert_eq!(message, "Please provide a destination and duration.");

        let no_duration = GenerateRequest {
            destination: Some("Paris".to_string()),
            ..GenerateRequest::default()
        };
        expect_invalid(parse_generate_request(no_duration));

        let blank_destination = legacy_body("   ", serde_json::json!(3), "Standard");
        expect_invalid(parse_generate_request(blank_destination));
    }

    #[test]
    fn duration_must_be_a_positive_integer() {
        expect_invalid(parse_generate_request(legacy_body(
            "Paris",
            serde_json::json!(0),
            "Standard",
        )));
        expect_invalid(parse_generate_request(legacy_body(
            "Paris",
            serde_json::json!(2.5),
            "Standard",
        )));
        expect_invalid(parse_generate_request(legacy_body(
            "Paris",
            serde_json::json!(-3),
            "Standard",
        )));
        expect_invalid(parse_generate_request(legacy_body(
            "Paris",
            serde_json::json!("soon"),
            "Standard",
        )));
    }

    #[test]
    fn numeric_string_duration_is_accepted() {
        let (request, _) = match parse_generate_request(legacy_body(
            "Paris",
            serde_json::json!("3"),
            "Economy",
        )) {
            Ok(parsed) => parsed,
            Err(err) => panic!("parse failed: {err}"),
        };
        assert_eq!(request.duration, 3);
    }

    #[test]
    fn unknown_budget_tier_is_rejected() {
        let message = expect_invalid(parse_generate_request(legacy_body(
            "Paris",
            serde_json::json!(3),
            "Platinum",
        )));
        assert_eq!(message, "Please select a valid budget tier.");
    }

    #[test]
    fn interest_body_defaults_the_modifiers() {
        let (request, _) = match parse_generate_request(interest_body()) {
            Ok(parsed) => parsed,
            Err(err) => panic!("parse failed: {err}"),
        };

        let GenerationMode::Interests(profile) = request.mode else {
            panic!("expected interest mode");
        };
        assert_eq!(profile.interests, "street art, seafood");
        assert_eq!(profile.travel_style, TravelStyle::Solo);
        assert_eq!(profile.pace, Pace::Balanced);
        assert_eq!(profile.transport, TransportMode::Walking);
        assert!(profile.dietary_restrictions.is_none());
    }

    #[test]
    fn missing_interests_is_rejected_without_budget() {
        let body = GenerateRequest {
            destination: Some("Lisbon".to_string()),
            duration: Some(serde_json::json!(4)),
            ..GenerateRequest::default()
        };
        let message = expect_invalid(parse_generate_request(body));
        assert_eq!(message, "Please provide your interests.");
    }

    #[test]
    fn unknown_modifier_values_are_rejected() {
        let mut body = interest_body();
        body.pace = Some("Frantic".to_string());
        let message = expect_invalid(parse_generate_request(body));
        assert_eq!(message, "Please select a valid pace.");

        let mut body = interest_body();
        body.transport = Some("Teleport".to_string());
        let message = expect_invalid(parse_generate_request(body));
        assert_eq!(message, "Please select a valid transport option.");
    }

    #[test]
    fn blank_dietary_restrictions_become_none() {
        let mut body = interest_body();
        body.dietary_restrictions = Some("   ".to_string());
        let (request, _) = match parse_generate_request(body) {
            Ok(parsed) => parsed,
            Err(err) => panic!("parse failed: {err}"),
        };
        let GenerationMode::Interests(profile) = request.mode else {
            panic!("expected interest mode");
        };
        assert!(profile.dietary_restrictions.is_none());
    }

    #[test]
    fn malformed_trip_id_reads_as_not_found() {
        let mut body = interest_body();
        body.trip_id = Some("not-a-uuid".to_string());
        assert!(matches!(
            parse_generate_request(body),
            Err(ApiError::NotFoundOrForbidden)
        ));
    }

    #[test]
    fn valid_trip_id_selects_regeneration() {
        let trip_id = TripId::new();
        let mut body = interest_body();
        body.trip_id = Some(trip_id.to_string());
        let (_, existing) = match parse_generate_request(body) {
            Ok(parsed) => parsed,
            Err(err) => panic!("parse failed: {err}"),
        };
        assert_eq!(existing, Some(trip_id));
    }
}
