//! REST endpoint handlers organized by resource.

pub mod generate;
pub mod refine;
pub mod system;
pub mod trips;

use axum::Router;

use crate::app_state::AppState;

/// Composes all resource routes mounted under `/api`.
pub fn routes() -> Router<AppState> {
    Router::new()
        .merge(generate::routes())
        .merge(refine::routes())
        .merge(trips::routes())
}
