//! Persistence layer: PostgreSQL trip storage.
//!
//! Provides the [`TripStore`] trait for durable storage of trips and
//! their itinerary documents. Every operation that touches an existing
//! trip filters by both trip id and owning user id, so a trip belonging
//! to another user behaves exactly like a trip that does not exist. The
//! concrete implementation uses `sqlx::PgPool` for async PostgreSQL
//! access.

pub mod models;
pub mod postgres;

pub use models::{SavedTrip, TripRecord, TripSummary};
pub use postgres::PostgresTripStore;

use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::{Itinerary, TripId, TripRequest};

/// Migrations embedded at compile time from `migrations/`.
pub static MIGRATOR: sqlx::migrate::Migrator = sqlx::migrate!();

/// Runs all pending embedded migrations against the pool.
///
/// # Errors
///
/// Returns the underlying [`sqlx::migrate::MigrateError`] when the
/// database is unreachable or a migration fails to apply.
pub async fn run_migrations(pool: &sqlx::PgPool) -> Result<(), sqlx::migrate::MigrateError> {
    MIGRATOR.run(pool).await
}

/// Storage failure, with the undefined-table case kept distinguishable.
///
/// Generation must survive a broken database, and the degraded response
/// tells the user whether the save failed because the schema was never
/// set up or for some transient reason. That split starts here.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// The query referenced a table that does not exist (Postgres 42P01).
    #[error("table \"{table}\" does not exist")]
    MissingTable {
        /// Relation name reported by the database.
        table: String,
    },

    /// Any other database failure.
    #[error("database error: {0}")]
    Database(#[source] sqlx::Error),
}

impl StoreError {
    /// Classifies an [`sqlx::Error`], detecting undefined-table errors.
    #[must_use]
    pub fn from_sqlx(err: sqlx::Error) -> Self {
        if let Some(db_err) = err.as_database_error()
            && db_err.code().as_deref() == Some("42P01")
        {
            let table = missing_relation_name(db_err.message())
                .unwrap_or_else(|| "unknown".to_string());
            return Self::MissingTable { table };
        }
        Self::Database(err)
    }

    /// True when the failure is an undefined-table error.
    #[must_use]
    pub const fn is_missing_table(&self) -> bool {
        matches!(self, Self::MissingTable { .. })
    }
}

/// Extracts the relation name from a Postgres undefined-table message,
/// e.g. `relation "trips" does not exist`.
fn missing_relation_name(message: &str) -> Option<String> {
    let start = message.find('"')? + 1;
    let rest = message.get(start..)?;
    let end = rest.find('"')?;
    rest.get(..end).map(str::to_string)
}

/// Durable trip storage.
///
/// `update_trip` carries the version-history contract: the previous
/// itinerary document is appended to the trip's history in the same
/// operation that overwrites it, so no successful update loses a
/// version. History is unbounded.
#[async_trait]
pub trait TripStore: Send + Sync {
    /// Inserts a new trip owned by `user_id`, titled after the itinerary,
    /// with an empty history.
    ///
    /// # Errors
    ///
    /// Returns a [`StoreError`] on database failure.
    async fn create_trip(
        &self,
        user_id: Uuid,
        request: &TripRequest,
        itinerary: &Itinerary,
    ) -> Result<SavedTrip, StoreError>;

    /// Overwrites the trip's itinerary, appending the previous document
    /// to its history. When `request` is given (regeneration), the title
    /// and request columns are refreshed as well; refinement passes
    /// `None` and leaves them untouched.
    ///
    /// Returns `Ok(None)` when no trip matches the id/owner pair.
    ///
    /// # Errors
    ///
    /// Returns a [`StoreError`] on database failure.
    async fn update_trip(
        &self,
        trip_id: TripId,
        user_id: Uuid,
        itinerary: &Itinerary,
        request: Option<&TripRequest>,
    ) -> Result<Option<SavedTrip>, StoreError>;

    /// Loads a full trip row. Returns `Ok(None)` when no trip matches
    /// the id/owner pair.
    ///
    /// # Errors
    ///
    /// Returns a [`StoreError`] on database failure.
    async fn fetch_trip(
        &self,
        trip_id: TripId,
        user_id: Uuid,
    ) -> Result<Option<TripRecord>, StoreError>;

    /// Lists the user's trips, newest first.
    ///
    /// # Errors
    ///
    /// Returns a [`StoreError`] on database failure.
    async fn list_trips(&self, user_id: Uuid) -> Result<Vec<TripSummary>, StoreError>;

    /// Deletes a trip. Returns `false` when no trip matches the id/owner
    /// pair.
    ///
    /// # Errors
    ///
    /// Returns a [`StoreError`] on database failure.
    async fn delete_trip(&self, trip_id: TripId, user_id: Uuid) -> Result<bool, StoreError>;

    /// Checks whether a profile row exists for the user. Used to detect
    /// accounts deleted underneath a still-valid session.
    ///
    /// # Errors
    ///
    /// Returns a [`StoreError`] on database failure, including
    /// [`StoreError::MissingTable`] when the profiles table was never
    /// created; callers decide how lenient to be about that.
    async fn profile_exists(&self, user_id: Uuid) -> Result<bool, StoreError>;
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;

    #[test]
    fn extracts_relation_name_from_postgres_message() {
        assert_eq!(
            missing_relation_name(r#"relation "trips" does not exist"#),
            Some("trips".to_string())
        );
    }

    #[test]
    fn relation_name_absent_when_unquoted() {
        assert_eq!(missing_relation_name("syntax error at end of input"), None);
    }

    #[test]
    fn missing_table_is_distinguishable() {
        let err = StoreError::MissingTable {
            table: "trips".to_string(),
        };
        assert!(err.is_missing_table());
        assert!(err.to_string().contains("trips"));

        let err = StoreError::Database(sqlx::Error::PoolClosed);
        assert!(!err.is_missing_table());
    }
}
