//! API routes
//!
//! Routes returned here are nested under `/api/v1` by
//! `axum_helpers::create_router`.

pub mod health;
pub mod users;

use axum::Router;

use crate::state::AppState;

pub fn routes(state: &AppState) -> Router {
    Router::new().nest("/users", users::router(state))
}
