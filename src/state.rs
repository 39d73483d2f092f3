use std::sync::Arc;

use sqlx::SqlitePool;
use tracing::info;

use crate::catalog;
use crate::config::AppConfig;
use crate::db;
use crate::nutrition::matching::FoodIndex;

#[derive(Clone)]
pub struct AppState {
    pub db: SqlitePool,
    pub foods: Arc<FoodIndex>,
}

impl AppState {
    /// Connects, migrates, seeds the catalog and builds the search index.
    pub async fn init(config: &AppConfig) -> anyhow::Result<Self> {
        let db = db::connect(&config.database_url).await?;
        db::migrate(&db).await?;
        catalog::ensure_loaded(&db, &config.catalog).await?;

        let foods = FoodIndex::new(catalog::repo::list_names(&db).await?);
        info!(foods = foods.len(), "food index ready");

        Ok(Self::from_parts(db, Arc::new(foods)))
    }

    pub fn from_parts(db: SqlitePool, foods: Arc<FoodIndex>) -> Self {
        Self { db, foods }
    }
}
