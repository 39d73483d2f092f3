use axum::{
    extract::{Query, State},
    routing::get,
    Json, Router,
};
use tracing::instrument;

use super::dto::{HistoryParams, HistoryResponse};
use super::repo;
use crate::{error::AppError, state::AppState};

pub fn history_routes() -> Router<AppState> {
    Router::new().route("/api/history", get(history))
}

#[instrument(skip(state))]
pub async fn history(
    State(state): State<AppState>,
    Query(params): Query<HistoryParams>,
) -> Result<Json<HistoryResponse>, AppError> {
    let messages = repo::recent(&state.db, params.limit()).await?;
    Ok(Json(HistoryResponse { ok: true, messages }))
}
