//! Saved trip management: list, load, delete.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Json, Router};

use crate::api::dto::{TripDetailResponse, TripListResponse, TripSummaryDto};
use crate::app_state::AppState;
use crate::auth::CurrentUser;
use crate::domain::TripId;
use crate::error::{ApiError, ErrorResponse};

/// `GET /api/trips` — List the user's saved trips, newest first.
///
/// # Errors
///
/// Returns [`ApiError::Internal`] on database failure.
#[utoipa::path(
    get,
    path = "/api/trips",
    tag = "Trips",
    summary = "List saved trips",
    description = "Returns the authenticated user's saved trips, newest first.",
    responses(
        (status = 200, description = "The user's trips", body = TripListResponse),
        (status = 401, description = "Not authenticated", body = ErrorResponse),
    ),
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn list_trips(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
) -> Result<impl IntoResponse, ApiError> {
    let summaries = state.trip_store.list_trips(user.id).await?;

    let trips = summaries
        .into_iter()
        .map(|summary| TripSummaryDto {
            id: summary.id,
            title: summary.title,
            destination: summary.destination,
            duration: summary.duration,
            created_at: summary.created_at,
        })
        .collect();

    Ok(Json(TripListResponse { trips }))
}

/// `GET /api/trips/{id}` — Load a full trip, itinerary and history included.
///
/// # Errors
///
/// Returns [`ApiError::NotFoundOrForbidden`] when the trip is absent or
/// owned by another user.
#[utoipa::path(
    get,
    path = "/api/trips/{id}",
    tag = "Trips",
    summary = "Load a saved trip",
    description = "Returns the full trip row: request fields, current itinerary document, and version history.",
    params(
        ("id" = String, Path, description = "Trip id"),
    ),
    responses(
        (status = 200, description = "Trip detail", body = TripDetailResponse),
        (status = 401, description = "Not authenticated", body = ErrorResponse),
        (status = 404, description = "Trip not found or not owned", body = ErrorResponse),
    ),
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn get_trip(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let trip_id = id
        .parse::<TripId>()
        .map_err(|_| ApiError::NotFoundOrForbidden)?;

    let record = state
        .trip_store
        .fetch_trip(trip_id, user.id)
        .await?
        .ok_or(ApiError::NotFoundOrForbidden)?;

    Ok(Json(TripDetailResponse {
        id: record.id,
        title: record.title,
        destination: record.destination,
        duration: record.duration,
        travel_style: record.travel_style,
        pace: record.pace,
        transport: record.transport,
        dietary_restrictions: record.dietary_restrictions,
        interests: record.interests,
        itinerary: record.itinerary_data,
        history: record.history,
        created_at: record.created_at,
        updated_at: record.updated_at,
    }))
}

/// `DELETE /api/trips/{id}` — Delete a saved trip.
///
/// # Errors
///
/// Returns [`ApiError::NotFoundOrForbidden`] when the trip is absent or
/// owned by another user.
#[utoipa::path(
    delete,
    path = "/api/trips/{id}",
    tag = "Trips",
    summary = "Delete a saved trip",
    description = "Deletes the trip and its history.",
    params(
        ("id" = String, Path, description = "Trip id"),
    ),
    responses(
        (status = 204, description = "Trip deleted"),
        (status = 401, description = "Not authenticated", body = ErrorResponse),
        (status = 404, description = "Trip not found or not owned", body = ErrorResponse),
    ),
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn delete_trip(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let trip_id = id
        .parse::<TripId>()
        .map_err(|_| ApiError::NotFoundOrForbidden)?;

    if state.trip_store.delete_trip(trip_id, user.id).await? {
        tracing::info!(trip_id = %trip_id, user_id = %user.id, "trip deleted");
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(ApiError::NotFoundOrForbidden)
    }
}

/// Trip management routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/trips", get(list_trips))
        .route("/trips/{id}", get(get_trip).delete(delete_trip))
}
