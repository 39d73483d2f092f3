use anyhow::Context;
use sqlx::{FromRow, SqlitePool};

use super::FoodRecord;

#[derive(Debug, Clone, FromRow)]
pub struct FoodRow {
    pub id: i64,
    pub food_name: String,
    pub calories: Option<f64>,
    pub protein: Option<f64>,
    pub carbs: Option<f64>,
    pub fat: Option<f64>,
}

pub async fn count(db: &SqlitePool) -> anyhow::Result<i64> {
    let n: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM nutrition")
        .fetch_one(db)
        .await
        .context("count foods")?;
    Ok(n)
}

/// Inserts all records in one transaction; duplicate names are ignored.
pub async fn insert_many(db: &SqlitePool, foods: &[FoodRecord]) -> anyhow::Result<u64> {
    let mut tx = db.begin().await.context("begin tx")?;
    let mut inserted = 0;
    for f in foods {
        let res = sqlx::query(
            r#"
            INSERT OR IGNORE INTO nutrition (food_name, calories, protein, carbs, fat)
            VALUES (?, ?, ?, ?, ?)
            "#,
        )
        .bind(&f.name)
        .bind(f.calories)
        .bind(f.protein)
        .bind(f.carbs)
        .bind(f.fat)
        .execute(&mut *tx)
        .await
        .with_context(|| format!("insert food {}", f.name))?;
        inserted += res.rows_affected();
    }
    tx.commit().await.context("commit tx")?;
    Ok(inserted)
}

/// All food names, sorted.
pub async fn list_names(db: &SqlitePool) -> anyhow::Result<Vec<String>> {
    let mut names: Vec<String> = sqlx::query_scalar("SELECT food_name FROM nutrition")
        .fetch_all(db)
        .await
        .context("list food names")?;
    names.sort();
    Ok(names)
}

pub async fn find_by_name_ci(db: &SqlitePool, name: &str) -> anyhow::Result<Option<FoodRow>> {
    let row = sqlx::query_as::<_, FoodRow>(
        r#"
        SELECT id, food_name, calories, protein, carbs, fat
          FROM nutrition
         WHERE LOWER(food_name) = LOWER(?)
         LIMIT 1
        "#,
    )
    .bind(name)
    .fetch_optional(db)
    .await
    .context("find food by name")?;
    Ok(row)
}

pub async fn find_by_name(db: &SqlitePool, name: &str) -> anyhow::Result<Option<FoodRow>> {
    let row = sqlx::query_as::<_, FoodRow>(
        r#"
        SELECT id, food_name, calories, protein, carbs, fat
          FROM nutrition
         WHERE food_name = ?
         LIMIT 1
        "#,
    )
    .bind(name)
    .fetch_optional(db)
    .await
    .context("find food by exact name")?;
    Ok(row)
}
