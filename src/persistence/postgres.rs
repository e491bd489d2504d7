//! PostgreSQL implementation of the trip store.
//!
//! The update path appends the previous `itinerary_data` onto `history`
//! in the same UPDATE statement that overwrites it, using the old row
//! value visible to the SET expressions. Concurrent updates to the same
//! trip therefore never lose a snapshot, though last-writer-wins still
//! applies to the current document.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use sqlx::types::Json;
use uuid::Uuid;

use super::models::{SavedTrip, TripRecord, TripSummary};
use super::{StoreError, TripStore};
use crate::domain::{GenerationMode, Itinerary, TripId, TripRequest};

/// PostgreSQL-backed trip store using `sqlx::PgPool`.
#[derive(Debug, Clone)]
pub struct PostgresTripStore {
    pool: PgPool,
}

impl PostgresTripStore {
    /// Creates a new trip store with the given connection pool.
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

/// Title for the trip row: the model's trip name, or a plain
/// destination/duration fallback when the model left it blank.
fn trip_title(request: &TripRequest, itinerary: &Itinerary) -> String {
    let name = itinerary.trip_name.trim();
    if name.is_empty() {
        format!("{} - {} days", request.destination, request.duration)
    } else {
        name.to_string()
    }
}

/// Splits a request into its nullable storage columns. Budget-mode
/// requests store NULL for the whole interest profile.
fn request_columns(
    request: &TripRequest,
) -> (
    Option<&str>,
    Option<&str>,
    Option<&str>,
    Option<&str>,
    Option<&str>,
) {
    match &request.mode {
        GenerationMode::Budget(_) => (None, None, None, None, None),
        GenerationMode::Interests(profile) => (
            Some(profile.interests.as_str()),
            Some(profile.travel_style.as_str()),
            Some(profile.pace.as_str()),
            Some(profile.transport.as_str()),
            profile.dietary_restrictions.as_deref(),
        ),
    }
}

#[async_trait]
impl TripStore for PostgresTripStore {
    async fn create_trip(
        &self,
        user_id: Uuid,
        request: &TripRequest,
        itinerary: &Itinerary,
    ) -> Result<SavedTrip, StoreError> {
        let (interests, travel_style, pace, transport, dietary) = request_columns(request);
        let row = sqlx::query_as::<_, (Uuid, DateTime<Utc>, DateTime<Utc>)>(
            "INSERT INTO trips (user_id, title, destination, duration, travel_style, pace, \
             transport, dietary_restrictions, interests, itinerary_data, history) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, '[]'::jsonb) \
             RETURNING id, created_at, updated_at",
        )
        .bind(user_id)
        .bind(trip_title(request, itinerary))
        .bind(&request.destination)
        .bind(i32::try_from(request.duration).unwrap_or(i32::MAX))
        .bind(travel_style)
        .bind(pace)
        .bind(transport)
        .bind(dietary)
        .bind(interests)
        .bind(Json(itinerary))
        .fetch_one(&self.pool)
        .await
        .map_err(StoreError::from_sqlx)?;

        Ok(SavedTrip {
            id: TripId::from_uuid(row.0),
            created_at: row.1,
            updated_at: row.2,
        })
    }

    async fn update_trip(
        &self,
        trip_id: TripId,
        user_id: Uuid,
        itinerary: &Itinerary,
        request: Option<&TripRequest>,
    ) -> Result<Option<SavedTrip>, StoreError> {
        let row = if let Some(request) = request {
            let (interests, travel_style, pace, transport, dietary) = request_columns(request);
            sqlx::query_as::<_, (Uuid, DateTime<Utc>, DateTime<Utc>)>(
                "UPDATE trips SET \
                 itinerary_data = $3, \
                 history = CASE WHEN itinerary_data IS NULL THEN history \
                           ELSE history || jsonb_build_array(itinerary_data) END, \
                 updated_at = now(), \
                 title = $4, destination = $5, duration = $6, travel_style = $7, \
                 pace = $8, transport = $9, dietary_restrictions = $10, interests = $11 \
                 WHERE id = $1 AND user_id = $2 \
                 RETURNING id, created_at, updated_at",
            )
            .bind(*trip_id.as_uuid())
            .bind(user_id)
            .bind(Json(itinerary))
            .bind(trip_title(request, itinerary))
            .bind(&request.destination)
            .bind(i32::try_from(request.duration).unwrap_or(i32::MAX))
            .bind(travel_style)
            .bind(pace)
            .bind(transport)
            .bind(dietary)
            .bind(interests)
            .fetch_optional(&self.pool)
            .await
        } else {
            sqlx::query_as::<_, (Uuid, DateTime<Utc>, DateTime<Utc>)>(
                "UPDATE trips SET \
                 itinerary_data = $3, \
                 history = CASE WHEN itinerary_data IS NULL THEN history \
                           ELSE history || jsonb_build_array(itinerary_data) END, \
                 updated_at = now() \
                 WHERE id = $1 AND user_id = $2 \
                 RETURNING id, created_at, updated_at",
            )
            .bind(*trip_id.as_uuid())
            .bind(user_id)
            .bind(Json(itinerary))
            .fetch_optional(&self.pool)
            .await
        }
        .map_err(StoreError::from_sqlx)?;

        Ok(row.map(|(id, created_at, updated_at)| SavedTrip {
            id: TripId::from_uuid(id),
            created_at,
            updated_at,
        }))
    }

    async fn fetch_trip(
        &self,
        trip_id: TripId,
        user_id: Uuid,
    ) -> Result<Option<TripRecord>, StoreError> {
        type Row = (
            Uuid,
            Uuid,
            String,
            String,
            i32,
            Option<String>,
            Option<String>,
            Option<String>,
            Option<String>,
            Option<String>,
            Option<serde_json::Value>,
            serde_json::Value,
            DateTime<Utc>,
            DateTime<Utc>,
        );
        let row = sqlx::query_as::<_, Row>(
            "SELECT id, user_id, title, destination, duration, travel_style, pace, transport, \
             dietary_restrictions, interests, itinerary_data, history, created_at, updated_at \
             FROM trips WHERE id = $1 AND user_id = $2",
        )
        .bind(*trip_id.as_uuid())
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(StoreError::from_sqlx)?;

        Ok(row.map(
            |(
                id,
                user_id,
                title,
                destination,
                duration,
                travel_style,
                pace,
                transport,
                dietary_restrictions,
                interests,
                itinerary_data,
                history,
                created_at,
                updated_at,
            )| {
                TripRecord {
                    id: TripId::from_uuid(id),
                    user_id,
                    title,
                    destination,
                    duration,
                    travel_style,
                    pace,
                    transport,
                    dietary_restrictions,
                    interests,
                    itinerary_data,
                    history,
                    created_at,
                    updated_at,
                }
            },
        ))
    }

    async fn list_trips(&self, user_id: Uuid) -> Result<Vec<TripSummary>, StoreError> {
        let rows = sqlx::query_as::<_, (Uuid, String, String, i32, DateTime<Utc>)>(
            "SELECT id, title, destination, duration, created_at FROM trips \
             WHERE user_id = $1 ORDER BY created_at DESC",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await
        .map_err(StoreError::from_sqlx)?;

        Ok(rows
            .into_iter()
            .map(|(id, title, destination, duration, created_at)| TripSummary {
                id: TripId::from_uuid(id),
                title,
                destination,
                duration,
                created_at,
            })
            .collect())
    }

    async fn delete_trip(&self, trip_id: TripId, user_id: Uuid) -> Result<bool, StoreError> {
        let result = sqlx::query("DELETE FROM trips WHERE id = $1 AND user_id = $2")
            .bind(*trip_id.as_uuid())
            .bind(user_id)
            .execute(&self.pool)
            .await
            .map_err(StoreError::from_sqlx)?;

        Ok(result.rows_affected() > 0)
    }

    async fn profile_exists(&self, user_id: Uuid) -> Result<bool, StoreError> {
        let row = sqlx::query_scalar::<_, Uuid>("SELECT id FROM profiles WHERE id = $1")
            .bind(user_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(StoreError::from_sqlx)?;

        Ok(row.is_some())
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;
    use crate::domain::BudgetTier;

    #[test]
    fn blank_trip_name_falls_back_to_destination_and_duration() {
        let request = TripRequest {
            destination: "Kyoto".to_string(),
            duration: 5,
            mode: GenerationMode::Budget(BudgetTier::Economy),
        };

        let blank = Itinerary {
            trip_name: "  ".to_string(),
            days: Vec::new(),
        };
        assert_eq!(trip_title(&request, &blank), "Kyoto - 5 days");

        let named = Itinerary {
            trip_name: "Kyoto Serenity".to_string(),
            days: Vec::new(),
        };
        assert_eq!(trip_title(&request, &named), "Kyoto Serenity");
    }
}
