//! Service layer: business logic orchestration.
//!
//! [`TripService`] coordinates the generation and refinement pipelines,
//! delegating model calls to [`crate::llm::ChatModel`] and persistence
//! to [`crate::persistence::TripStore`].

pub mod trip_service;

pub use trip_service::{GenerateOutcome, RefineOutcome, TripService};
