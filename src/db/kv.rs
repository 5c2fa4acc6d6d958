use anyhow::{Context, Result};
use chrono::Utc;
use sqlx::{Row, SqlitePool};

/// Read a value by key
pub async fn get_value(pool: &SqlitePool, key: &str) -> Result<Option<String>> {
    let row = sqlx::query(
        r#"
        SELECT value FROM kv_store
        WHERE key = ?
        "#,
    )
    .bind(key)
    .fetch_optional(pool)
    .await
    .with_context(|| format!("Failed to read key {key}"))?;

    match row {
        Some(row) => Ok(Some(row.try_get("value")?)),
        None => Ok(None),
    }
}

/// Insert or overwrite a value
pub async fn set_value(pool: &SqlitePool, key: &str, value: &str) -> Result<()> {
    let updated_at = Utc::now().to_rfc3339();

    sqlx::query(
        r#"
        INSERT INTO kv_store (key, value, updated_at)
        VALUES (?, ?, ?)
        ON CONFLICT(key) DO UPDATE SET value = excluded.value, updated_at = excluded.updated_at
        "#,
    )
    .bind(key)
    .bind(value)
    .bind(updated_at)
    .execute(pool)
    .await
    .with_context(|| format!("Failed to write key {key}"))?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::create_pool;

    #[tokio::test]
    async fn test_set_overwrites() {
        let dir = tempfile::tempdir().unwrap();
        let pool = create_pool(&dir.path().join("kv.db")).await.unwrap();

        assert_eq!(get_value(&pool, "gameHistory").await.unwrap(), None);

        set_value(&pool, "gameHistory", "[]").await.unwrap();
        set_value(&pool, "gameHistory", r#"[{"id":"alpha"}]"#).await.unwrap();
        assert_eq!(
            get_value(&pool, "gameHistory").await.unwrap().as_deref(),
            Some(r#"[{"id":"alpha"}]"#)
        );
        assert_eq!(get_value(&pool, "gameStats").await.unwrap(), None);
    }
}
