use std::str::FromStr;

use anyhow::Context;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::SqlitePool;

pub async fn connect(database_url: &str) -> anyhow::Result<SqlitePool> {
    let options = SqliteConnectOptions::from_str(database_url)
        .with_context(|| format!("parse database url {}", database_url))?
        .create_if_missing(true);

    let mut pool = SqlitePoolOptions::new().max_connections(10);
    if database_url.contains(":memory:") {
        // an in-memory database lives and dies with its single connection
        pool = pool
            .max_connections(1)
            .idle_timeout(None)
            .max_lifetime(None);
    }

    let db = pool
        .connect_with(options)
        .await
        .context("connect to database")?;
    Ok(db)
}

pub async fn migrate(db: &SqlitePool) -> anyhow::Result<()> {
    sqlx::migrate!("./migrations")
        .run(db)
        .await
        .context("run migrations")?;
    Ok(())
}

#[cfg(test)]
pub(crate) async fn memory() -> SqlitePool {
    let db = connect("sqlite::memory:").await.unwrap();
    migrate(&db).await.unwrap();
    db
}

#[cfg(test)]
mod tests {
    #[tokio::test]
    async fn memory_database_has_schema() {
        let db = super::memory().await;
        let n: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM nutrition")
            .fetch_one(&db)
            .await
            .unwrap();
        assert_eq!(n, 0);
        let n: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM messages")
            .fetch_one(&db)
            .await
            .unwrap();
        assert_eq!(n, 0);
    }
}
