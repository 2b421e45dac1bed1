//! Route handlers for the back-office JSON API.

pub mod bins;
pub mod cycles;
pub mod zones;

use axum::Router;

use crate::state::AppState;

/// Build the combined application router.
pub fn routes() -> Router<AppState> {
    Router::new()
        .merge(zones::router())
        .merge(bins::router())
        .merge(cycles::router())
}
