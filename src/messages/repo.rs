use anyhow::Context;
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, SqlitePool};
use time::{format_description::well_known::Rfc3339, OffsetDateTime};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    User,
    Assistant,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::User => "user",
            Role::Assistant => "assistant",
        }
    }
}

/// A conversation line as stored; macros are set only on successful replies.
#[derive(Debug, Clone, Default)]
pub struct NewMessage {
    pub text: String,
    pub query: Option<String>,
    pub weight_g: Option<i64>,
    pub calories: Option<f64>,
    pub protein: Option<f64>,
    pub carbs: Option<f64>,
    pub fat: Option<f64>,
}

impl NewMessage {
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            ..Default::default()
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct MessageRow {
    pub role: String,
    pub text: String,
    pub query: Option<String>,
    pub weight_g: Option<i64>,
    pub calories: Option<f64>,
    pub protein: Option<f64>,
    pub carbs: Option<f64>,
    pub fat: Option<f64>,
    pub created_at: String,
}

pub async fn insert(db: &SqlitePool, role: Role, msg: &NewMessage) -> anyhow::Result<()> {
    let created_at = OffsetDateTime::now_utc()
        .format(&Rfc3339)
        .context("format timestamp")?;
    sqlx::query(
        r#"
        INSERT INTO messages (role, text, query, weight_g, calories, protein, carbs, fat, created_at)
        VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(role.as_str())
    .bind(&msg.text)
    .bind(&msg.query)
    .bind(msg.weight_g)
    .bind(msg.calories)
    .bind(msg.protein)
    .bind(msg.carbs)
    .bind(msg.fat)
    .bind(created_at)
    .execute(db)
    .await
    .context("insert message")?;
    Ok(())
}

/// Newest first.
pub async fn recent(db: &SqlitePool, limit: i64) -> anyhow::Result<Vec<MessageRow>> {
    let rows = sqlx::query_as::<_, MessageRow>(
        r#"
        SELECT role, text, query, weight_g, calories, protein, carbs, fat, created_at
          FROM messages
         ORDER BY id DESC
         LIMIT ?
        "#,
    )
    .bind(limit)
    .fetch_all(db)
    .await
    .context("list recent messages")?;
    Ok(rows)
}
