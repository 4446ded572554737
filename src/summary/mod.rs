//! Dashboard totals and the over-budget alert.

pub mod dto;
pub mod engine;
pub mod handlers;
pub mod service;

use crate::state::AppState;
use axum::Router;

pub fn router() -> Router<AppState> {
    handlers::summary_routes()
}
