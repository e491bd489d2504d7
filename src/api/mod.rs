//! REST API layer: route handlers, DTOs, and router composition.
//!
//! All endpoints are mounted under `/api` except the health check.

pub mod dto;
pub mod handlers;

use axum::Router;
use utoipa::OpenApi;
use utoipa::openapi::security::{Http, HttpAuthScheme, SecurityScheme};

use crate::app_state::AppState;

/// Builds the complete API router with all REST endpoints.
pub fn build_router() -> Router<AppState> {
    Router::new()
        .nest("/api", handlers::routes())
        .merge(handlers::system::routes())
}

/// Builds the OpenAPI document covering every endpoint.
#[must_use]
pub fn openapi() -> utoipa::openapi::OpenApi {
    #[derive(OpenApi)]
    #[openapi(
        paths(
            handlers::generate::generate_itinerary,
            handlers::refine::refine_itinerary,
            handlers::trips::list_trips,
            handlers::trips::get_trip,
            handlers::trips::delete_trip,
            handlers::system::health_handler,
        ),
        components(schemas(
            crate::domain::Activity,
            crate::domain::Itinerary,
            crate::domain::ItineraryDay,
            crate::error::ErrorResponse,
        )),
        tags(
            (name = "Itineraries", description = "Itinerary generation and refinement"),
            (name = "Trips", description = "Saved trip management"),
            (name = "System", description = "Health and metadata"),
        )
    )]
    struct ApiDoc;

    let mut spec = ApiDoc::openapi();
    if let Some(components) = spec.components.as_mut() {
        components.add_security_scheme(
            "bearer_auth",
            SecurityScheme::Http(Http::new(HttpAuthScheme::Bearer)),
        );
    }
    spec
}
