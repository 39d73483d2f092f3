use axum::{body::Bytes, extract::State, routing::post, Json, Router};
use tracing::{info, instrument, warn};

use super::dto::{NutritionRequest, NutritionResponse};
use super::services::{self, find_food, parse_query, Portion};
use crate::{
    error::AppError,
    messages::repo::{self as messages, NewMessage, Role},
    state::AppState,
};

pub fn lookup_routes() -> Router<AppState> {
    Router::new().route("/api/nutrition", post(lookup))
}

/// History is best effort; a failed write never fails the lookup.
async fn record(state: &AppState, role: Role, msg: NewMessage) {
    if let Err(e) = messages::insert(&state.db, role, &msg).await {
        warn!(error = %e, role = role.as_str(), "failed to record message");
    }
}

#[instrument(skip(state, body))]
pub async fn lookup(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Json<NutritionResponse>, AppError> {
    let req = NutritionRequest::from_body(&body);
    let raw = req.query.trim();
    let (query, parsed_weight) = parse_query(raw);
    let weight = req.explicit_weight().unwrap_or(parsed_weight).max(1);

    record(
        &state,
        Role::User,
        NewMessage {
            text: raw.to_string(),
            query: Some(query.clone()),
            weight_g: Some(weight),
            ..Default::default()
        },
    )
    .await;

    if query.is_empty() {
        let msg = "Please provide a food name.";
        record(&state, Role::Assistant, NewMessage::text(msg)).await;
        return Err(AppError::BadRequest(msg.into()));
    }

    let Some(found) = find_food(&state.db, &state.foods, &query).await? else {
        let suggestions = services::suggestions(&state.foods, &query);
        let message = services::not_found_message(&suggestions);
        info!(%query, suggestions = suggestions.len(), "food not found");
        record(&state, Role::Assistant, NewMessage::text(message.clone())).await;
        return Err(AppError::NotFound {
            message,
            suggestions,
        });
    };

    let portion = Portion::scale(&found.food, weight);
    let text = portion.describe(&found.name, weight);
    record(
        &state,
        Role::Assistant,
        NewMessage {
            text: text.clone(),
            query: Some(found.name.clone()),
            weight_g: Some(weight),
            calories: Some(portion.calories),
            protein: Some(portion.protein),
            carbs: Some(portion.carbs),
            fat: Some(portion.fat),
        },
    )
    .await;

    info!(%query, matched = %found.name, weight, confidence = found.confidence, "food matched");
    Ok(Json(NutritionResponse {
        ok: true,
        matched_name: found.name,
        confidence: found.confidence,
        weight_g: weight,
        calories: portion.calories,
        protein: portion.protein,
        carbs: portion.carbs,
        fat: portion.fat,
        text,
    }))
}
