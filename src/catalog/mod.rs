pub mod csv;
pub mod repo;
pub mod seed;

use std::path::Path;

use anyhow::Context;
use sqlx::SqlitePool;
use tracing::{info, warn};

use crate::config::CatalogConfig;

/// One catalog row; macros are per 100 g.
#[derive(Debug, Clone, PartialEq)]
pub struct FoodRecord {
    pub name: String,
    pub calories: f64,
    pub protein: f64,
    pub carbs: f64,
    pub fat: f64,
}

impl FoodRecord {
    fn from_fields(fields: &[String]) -> Option<Self> {
        let [name, calories, protein, carbs, fat] = fields else {
            return None;
        };
        let name = name.trim();
        if name.is_empty() {
            return None;
        }
        Some(Self {
            name: name.to_string(),
            calories: calories.trim().parse().ok()?,
            protein: protein.trim().parse().ok()?,
            carbs: carbs.trim().parse().ok()?,
            fat: fat.trim().parse().ok()?,
        })
    }
}

/// Reads a catalog CSV. The header row and malformed rows are skipped.
pub fn read_csv(path: &Path) -> anyhow::Result<Vec<FoodRecord>> {
    let body =
        std::fs::read_to_string(path).with_context(|| format!("read {}", path.display()))?;
    let mut foods = Vec::new();
    for (line, record) in csv::split_records(&body).into_iter().skip(1) {
        if record.trim().is_empty() {
            continue;
        }
        match csv::parse_record(&record).and_then(|f| FoodRecord::from_fields(&f)) {
            Some(food) => foods.push(food),
            None => warn!(line, "skipping malformed catalog row"),
        }
    }
    Ok(foods)
}

/// Loads the CSV into an empty `nutrition` table. A populated table is left
/// untouched. Returns the number of rows inserted.
pub async fn load_csv(db: &SqlitePool, path: &Path) -> anyhow::Result<u64> {
    if repo::count(db).await? > 0 {
        return Ok(0);
    }
    let foods = read_csv(path)?;
    let inserted = repo::insert_many(db, &foods).await?;
    info!(path = %path.display(), inserted, "loaded food catalog");
    Ok(inserted)
}

/// Generates the seed CSV if missing, then loads it.
pub async fn ensure_loaded(db: &SqlitePool, cfg: &CatalogConfig) -> anyhow::Result<()> {
    let path = Path::new(&cfg.csv_path);
    seed::generate_csv(path, cfg.seed_rows)?;
    load_csv(db, path).await?;
    Ok(())
}
