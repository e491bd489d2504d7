//! Generation DTOs: request in both accepted shapes, and the response
//! with its save metadata.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::{Itinerary, TripId};

/// Request body for `POST /api/generate`.
///
/// Two client forms share this endpoint: the interest-led form sends
/// `interests` plus style/pace/transport/diet modifiers, while the
/// legacy form sends a `budget` tier instead. Everything is optional at
/// the serde level; the handler validates and picks the mode, so the
/// error messages can say exactly what is missing.
#[derive(Debug, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct GenerateRequest {
    /// Destination, e.g. "Paris, France".
    #[serde(default)]
    pub destination: Option<String>,
    /// Trip length in days. Accepts a JSON number or a numeric string.
    #[serde(default)]
    #[schema(value_type = Option<u32>)]
    pub duration: Option<serde_json::Value>,
    /// Legacy budget tier; its presence selects the legacy form.
    #[serde(default)]
    pub budget: Option<String>,
    /// Free-text interests for the interest-led form.
    #[serde(default)]
    pub interests: Option<String>,
    /// Travel style label; defaults to "Solo" when omitted.
    #[serde(default)]
    pub travel_style: Option<String>,
    /// Pace label; defaults to "Balanced" when omitted.
    #[serde(default)]
    pub pace: Option<String>,
    /// Transport label; defaults to "Walking" when omitted.
    #[serde(default)]
    pub transport: Option<String>,
    /// Dietary restrictions; blank means none.
    #[serde(default)]
    pub dietary_restrictions: Option<String>,
    /// When set, regenerates this trip in place instead of creating one.
    #[serde(default)]
    pub trip_id: Option<String>,
}

/// Response body for `POST /api/generate`.
///
/// `itinerary_id` and `created_at` serialize as explicit nulls when the
/// save failed, so the degraded shape is unmistakable; `updated_at` and
/// `save_error` only appear when set.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct GenerateResponse {
    /// The generated itinerary.
    pub itinerary: Itinerary,
    /// Saved trip id, null when the save failed.
    pub itinerary_id: Option<TripId>,
    /// Trip creation timestamp, null when the save failed.
    pub created_at: Option<DateTime<Utc>>,
    /// Set only when an existing trip was regenerated.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
    /// Set only when the itinerary could not be saved.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub save_error: Option<String>,
}
