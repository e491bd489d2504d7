//! Domain layer: trip identity, request vocabulary, and the itinerary model.
//!
//! This module contains the server-side domain model including trip
//! identity, the validated generation request with its budget- and
//! interest-led modes, and the itinerary document shape together with
//! the validation of raw model output into typed itineraries.

pub mod itinerary;
pub mod trip_id;
pub mod trip_request;

pub use itinerary::{Activity, Itinerary, ItineraryDay, ItineraryParseError};
pub use trip_id::TripId;
pub use trip_request::{
    BudgetTier, GenerationMode, InterestProfile, Pace, TransportMode, TravelStyle, TripRequest,
};
