//! REST endpoint handlers organized by resource.

pub mod players;
pub mod registration;
pub mod sponsors;
pub mod system;
pub mod teams;

use axum::Router;

use crate::app_state::AppState;

/// Composes all resource routes under `/api/v1`.
pub fn routes() -> Router<AppState> {
    Router::new()
        .merge(registration::routes())
        .merge(players::routes())
        .merge(teams::routes())
        .merge(sponsors::routes())
}
