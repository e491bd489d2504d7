//! Database models for trip rows.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::TripId;

/// Write acknowledgement for an inserted or updated trip row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SavedTrip {
    /// Trip row id.
    pub id: TripId,
    /// Server-side creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Server-side last-update timestamp.
    pub updated_at: DateTime<Utc>,
}

/// Sidebar-sized projection of a trip row.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TripSummary {
    /// Trip row id.
    pub id: TripId,
    /// Display title, taken from the itinerary's trip name.
    pub title: String,
    /// Trip destination.
    pub destination: String,
    /// Trip length in days.
    pub duration: i32,
    /// Server-side creation timestamp.
    pub created_at: DateTime<Utc>,
}

/// A full trip row from the `trips` table.
///
/// The request columns are nullable: legacy budget-mode trips carry no
/// interest profile. `itinerary_data` is the document as stored, without
/// shape guarantees; rows written by older deployments may not match the
/// current itinerary schema.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TripRecord {
    /// Trip row id.
    pub id: TripId,
    /// Owning user id.
    pub user_id: Uuid,
    /// Display title, taken from the itinerary's trip name.
    pub title: String,
    /// Trip destination.
    pub destination: String,
    /// Trip length in days.
    pub duration: i32,
    /// Who travelled, for interest-led requests.
    pub travel_style: Option<String>,
    /// Daily activity density, for interest-led requests.
    pub pace: Option<String>,
    /// Assumed transport mode, for interest-led requests.
    pub transport: Option<String>,
    /// Dietary restrictions, when given.
    pub dietary_restrictions: Option<String>,
    /// Free-text interests, for interest-led requests.
    pub interests: Option<String>,
    /// Current itinerary document as JSONB.
    pub itinerary_data: Option<serde_json::Value>,
    /// Prior itinerary documents, oldest first, as a JSONB array.
    pub history: serde_json::Value,
    /// Server-side creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Server-side last-update timestamp.
    pub updated_at: DateTime<Utc>,
}
