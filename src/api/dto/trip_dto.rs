//! Trip listing and detail DTOs.

use chrono::{DateTime, Utc};
use serde::Serialize;
use utoipa::ToSchema;

use crate::domain::TripId;

/// One saved trip in the `GET /api/trips` listing.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TripSummaryDto {
    /// Trip id.
    pub id: TripId,
    /// Display title.
    pub title: String,
    /// Trip destination.
    pub destination: String,
    /// Trip length in days.
    pub duration: i32,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
}

/// Response body for `GET /api/trips`, newest trips first.
#[derive(Debug, Serialize, ToSchema)]
pub struct TripListResponse {
    /// The user's saved trips.
    pub trips: Vec<TripSummaryDto>,
}

/// Full trip detail for `GET /api/trips/{id}`.
///
/// The request fields are null for legacy budget-mode trips, and the
/// itinerary is passed through as stored, without shape guarantees.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TripDetailResponse {
    /// Trip id.
    pub id: TripId,
    /// Display title.
    pub title: String,
    /// Trip destination.
    pub destination: String,
    /// Trip length in days.
    pub duration: i32,
    /// Travel style the trip was generated with, if any.
    pub travel_style: Option<String>,
    /// Pace the trip was generated with, if any.
    pub pace: Option<String>,
    /// Transport mode the trip was generated with, if any.
    pub transport: Option<String>,
    /// Dietary restrictions the trip was generated with, if any.
    pub dietary_restrictions: Option<String>,
    /// Interests the trip was generated with, if any.
    pub interests: Option<String>,
    /// Current itinerary document as stored; may be null.
    #[schema(value_type = Option<Object>)]
    pub itinerary: Option<serde_json::Value>,
    /// Prior itinerary versions, oldest first.
    #[schema(value_type = Object)]
    pub history: serde_json::Value,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last update timestamp.
    pub updated_at: DateTime<Utc>,
}
