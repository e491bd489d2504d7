//! # escapade-api
//!
//! REST API for AI-assisted travel itinerary generation and refinement.
//!
//! An authenticated user describes a trip; the service prompts a chat
//! model for a structured multi-day itinerary, validates the response,
//! and saves it as a trip. Follow-up free-text edits refine the saved
//! itinerary, with every previous version kept in the trip's history.
//!
//! ## Architecture
//!
//! ```text
//! Clients (HTTP)
//!     │
//!     ├── REST Handlers (api/)
//!     ├── CurrentUser extractor (auth/)
//!     │
//!     ├── TripService (service/)
//!     │     ├── prompts + ChatModel (llm/)
//!     │     └── response validation (domain/)
//!     │
//!     └── TripStore → PostgreSQL (persistence/)
//! ```

pub mod api;
pub mod app_state;
pub mod auth;
pub mod config;
pub mod domain;
pub mod error;
pub mod llm;
pub mod persistence;
pub mod service;
