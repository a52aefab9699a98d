use anyhow::Result;

use super::schema::Database;
use super::types::ValueKind;

impl Database {
    // ========================================================================
    // Raw Key/Value Operations
    // ========================================================================

    /// Read the raw value stored under `key`, whatever its kind.
    pub async fn get_value(&self, key: &str) -> Result<Option<String>> {
        let row: Option<(String,)> = sqlx::query_as("SELECT value FROM kv_store WHERE key = ?")
            .bind(key)
            .fetch_optional(&self.pool)
            .await?;

        Ok(row.map(|(value,)| value))
    }

    /// Store `value` under `key` (UPSERT), tagging the row with `kind`.
    pub async fn set_value(&self, key: &str, kind: ValueKind, value: &str) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO kv_store (key, kind, value, updated_at)
            VALUES (?, ?, ?, datetime('now'))
            ON CONFLICT(key) DO UPDATE SET
                kind = excluded.kind,
                value = excluded.value,
                updated_at = excluded.updated_at
        "#,
        )
        .bind(key)
        .bind(kind.as_str())
        .bind(value)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Delete `key`. Returns true if a row was removed.
    pub async fn remove_value(&self, key: &str) -> Result<bool> {
        let result = sqlx::query("DELETE FROM kv_store WHERE key = ?")
            .bind(key)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Delete every row of `kind`. Returns the number of rows removed.
    pub async fn remove_kind(&self, kind: ValueKind) -> Result<u64> {
        let result = sqlx::query("DELETE FROM kv_store WHERE kind = ?")
            .bind(kind.as_str())
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected())
    }

    /// Count rows of `kind`.
    pub async fn count_kind(&self, kind: ValueKind) -> Result<i64> {
        let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM kv_store WHERE kind = ?")
            .bind(kind.as_str())
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }
}
