//! Type-safe trip identifier.
//!
//! [`TripId`] is a newtype wrapper around [`uuid::Uuid`] (v4) providing
//! type safety so that trip identifiers cannot be confused with user ids
//! or other UUIDs flowing through the request pipeline.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Unique identifier for a saved trip.
///
/// Wraps a UUID v4. Assigned by the database when a trip row is first
/// inserted and immutable thereafter. Used to address a trip in update,
/// refinement, and delete operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(transparent)]
pub struct TripId(uuid::Uuid);

impl TripId {
    /// Creates a new random `TripId` (UUID v4).
    #[must_use]
    pub fn new() -> Self {
        Self(uuid::Uuid::new_v4())
    }

    /// Creates a `TripId` from an existing [`uuid::Uuid`].
    #[must_use]
    pub const fn from_uuid(uuid: uuid::Uuid) -> Self {
        Self(uuid)
    }

    /// Returns the inner [`uuid::Uuid`].
    #[must_use]
    pub const fn as_uuid(&self) -> &uuid::Uuid {
        &self.0
    }
}

impl Default for TripId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for TripId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for TripId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        uuid::Uuid::parse_str(s).map(Self)
    }
}

impl From<uuid::Uuid> for TripId {
    fn from(uuid: uuid::Uuid) -> Self {
        Self(uuid)
    }
}

impl From<TripId> for uuid::Uuid {
    fn from(id: TripId) -> Self {
        id.0
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;

    #[test]
    fn new_generates_unique_ids() {
        let a = TripId::new();
        let b = TripId::new();
        assert_ne!(a, b);
    }

    #[test]
    fn display_is_uuid_format() {
        let id = TripId::new();
        let s = format!("{id}");
        assert_eq!(s.len(), 36); // UUID string length
        assert!(s.contains('-'));
    }

    #[test]
    fn serde_round_trip() {
        let id = TripId::new();
        let json = serde_json::to_string(&id).ok();
        let Some(json) = json else {
            panic!("serialization failed");
        };
        let deserialized: TripId = serde_json::from_str(&json).ok().unwrap_or_else(|| {
            panic!("deserialization failed");
        });
        assert_eq!(id, deserialized);
    }

    #[test]
    fn parses_from_canonical_string() {
        let uuid = uuid::Uuid::new_v4();
        let parsed = TripId::from_str(&uuid.to_string()).ok();
        assert_eq!(parsed, Some(TripId::from_uuid(uuid)));
    }

    #[test]
    fn rejects_garbage_string() {
        assert!(TripId::from_str("not-a-uuid").is_err());
    }
}
