//! escapade-api server entry point.
//!
//! Wires configuration, the PostgreSQL pool, the model provider client,
//! and the trip service into an Axum HTTP server.

use std::sync::Arc;
use std::time::Duration;

use axum::Router;
use sqlx::postgres::PgPoolOptions;
use tower_http::cors::CorsLayer;
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;

use escapade_api::api;
use escapade_api::app_state::AppState;
use escapade_api::auth::PostgresSessionProvider;
use escapade_api::config::AppConfig;
use escapade_api::llm::OpenAiChatModel;
use escapade_api::persistence::{self, PostgresTripStore, TripStore};
use escapade_api::service::TripService;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    // Load configuration
    let config = AppConfig::from_env()?;
    tracing::info!(addr = %config.listen_addr, "starting escapade-api");

    // Connect to PostgreSQL. `connect_lazy` defers the first connection
    // until a query needs one, so startup does not depend on the
    // database being reachable.
    let pool = PgPoolOptions::new()
        .max_connections(config.database_max_connections)
        .min_connections(config.database_min_connections)
        .acquire_timeout(Duration::from_secs(config.database_connect_timeout_secs))
        .connect_lazy(&config.database_url)?;

    if config.migrate_on_start {
        if let Err(err) = persistence::run_migrations(&pool).await {
            tracing::warn!(error = %err, "migrations failed, continuing with the existing schema");
        }
    }

    // Build service layer
    let model = OpenAiChatModel::new(
        config.openai_api_key,
        &config.openai_base_url,
        Duration::from_secs(config.model_timeout_secs),
    )?;
    let trip_store = Arc::new(PostgresTripStore::new(pool.clone()));
    let sessions = Arc::new(PostgresSessionProvider::new(pool));
    let trip_service = Arc::new(TripService::new(
        Arc::new(model),
        Arc::clone(&trip_store) as Arc<dyn TripStore>,
        config.generation_model,
        config.refinement_model,
    ));

    // Build application state
    let app_state = AppState {
        trip_service,
        trip_store,
        sessions,
    };

    // Build router
    let app = Router::new().merge(api::build_router());

    #[cfg(feature = "swagger-ui")]
    let app = app.merge(
        utoipa_swagger_ui::SwaggerUi::new("/docs").url("/api-docs/openapi.json", api::openapi()),
    );

    let app = app
        .layer(TimeoutLayer::new(Duration::from_secs(
            config.request_timeout_secs,
        )))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(app_state);

    // Start server
    let listener = tokio::net::TcpListener::bind(config.listen_addr).await?;
    tracing::info!(addr = %config.listen_addr, "server listening");

    axum::serve(listener, app).await?;

    Ok(())
}
