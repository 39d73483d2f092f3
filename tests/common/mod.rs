use std::sync::Arc;

use behealthy::catalog::{repo, FoodRecord};
use behealthy::nutrition::matching::FoodIndex;
use behealthy::state::AppState;

pub fn food(name: &str, calories: f64, protein: f64, carbs: f64, fat: f64) -> FoodRecord {
    FoodRecord {
        name: name.into(),
        calories,
        protein,
        carbs,
        fat,
    }
}

/// In-memory service state with a small fixed catalog.
pub async fn state() -> AppState {
    let db = behealthy::db::connect("sqlite::memory:").await.unwrap();
    behealthy::db::migrate(&db).await.unwrap();
    repo::insert_many(
        &db,
        &[
            food("chicken breast", 165.0, 31.0, 0.0, 3.6),
            food("grilled chicken breast", 170.0, 30.0, 0.0, 4.0),
            food("salmon", 208.0, 20.4, 0.0, 13.4),
            food("banana", 89.0, 1.1, 23.0, 0.3),
        ],
    )
    .await
    .unwrap();
    let foods = FoodIndex::new(repo::list_names(&db).await.unwrap());

    AppState::from_parts(db, Arc::new(foods))
}
