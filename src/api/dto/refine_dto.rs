//! Refinement DTOs.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::{Itinerary, TripId};

/// Request body for `POST /api/refine`.
///
/// `current_itinerary` is the client's snapshot of the document being
/// edited. It is kept as raw JSON rather than a typed [`Itinerary`] so
/// trips saved under an older document shape can still be refined.
#[derive(Debug, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RefineRequest {
    /// Id of the trip being refined.
    #[serde(default)]
    pub trip_id: Option<String>,
    /// Free-text edit request.
    #[serde(default)]
    pub message: Option<String>,
    /// The itinerary the edit applies to, as the client last saw it.
    #[serde(default)]
    #[schema(value_type = Option<Object>)]
    pub current_itinerary: Option<serde_json::Value>,
}

/// Response body for `POST /api/refine`.
///
/// The successful shape carries `updated_at`; the degraded-save shape
/// carries `save_error` instead. `itinerary_id` is always the refined
/// trip's id, even when the save failed.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RefineResponse {
    /// The refined itinerary.
    pub itinerary: Itinerary,
    /// Id of the refined trip.
    pub itinerary_id: TripId,
    /// Update timestamp, absent when the save failed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
    /// Set only when the refinement could not be saved.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub save_error: Option<String>,
}
