pub mod dto;
pub mod handlers;
pub mod matching;
pub mod services;

use crate::state::AppState;
use axum::Router;

pub fn router() -> Router<AppState> {
    Router::new().merge(handlers::lookup_routes())
}
