//! Shared application state injected into all Axum handlers.

use std::sync::Arc;

use crate::auth::SessionProvider;
use crate::persistence::TripStore;
use crate::service::TripService;

/// Shared application state available to all handlers via Axum's
/// `State` extractor.
#[derive(Clone)]
pub struct AppState {
    /// Trip service driving the generation and refinement flows.
    pub trip_service: Arc<TripService>,
    /// Direct trip storage for listing, loading, and deleting trips.
    pub trip_store: Arc<dyn TripStore>,
    /// Session resolution for bearer-token authentication.
    pub sessions: Arc<dyn SessionProvider>,
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState")
            .field("trip_service", &self.trip_service)
            .finish_non_exhaustive()
    }
}
