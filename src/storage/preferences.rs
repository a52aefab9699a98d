use anyhow::Result;

use super::schema::Database;
use super::types::ValueKind;
use crate::theme::ThemeVariant;

/// Durable key holding the selected theme.
pub const THEME_KEY: &str = "theme";

impl Database {
    // ========================================================================
    // User Preferences Operations
    // ========================================================================

    /// Get a single preference value by key.
    pub async fn get_preference(&self, key: &str) -> Result<Option<String>> {
        self.get_value(key).await
    }

    /// Set a preference value (UPSERT).
    pub async fn set_preference(&self, key: &str, value: &str) -> Result<()> {
        self.set_value(key, ValueKind::Preference, value).await
    }

    /// Stored theme, if one was saved and is recognised.
    pub async fn stored_theme(&self) -> Result<Option<ThemeVariant>> {
        let value = self.get_preference(THEME_KEY).await?;
        Ok(value.and_then(|v| {
            let variant = ThemeVariant::from_str_name(&v);
            if variant.is_none() {
                tracing::warn!(value = %v, "Ignoring unknown stored theme");
            }
            variant
        }))
    }

    /// Flip the stored theme and persist it.
    ///
    /// A stored `light` becomes dark and any other stored value becomes
    /// light. `current` is flipped when nothing is stored yet. Returns the
    /// new variant.
    ///
    /// Read, flip and write happen in one statement, so concurrent toggles
    /// never both read the same value.
    pub async fn toggle_theme(&self, current: ThemeVariant) -> Result<ThemeVariant> {
        let (value,): (String,) = sqlx::query_as(
            r#"
            INSERT INTO kv_store (key, kind, value, updated_at)
            VALUES (?, ?, ?, datetime('now'))
            ON CONFLICT(key) DO UPDATE SET
                kind = excluded.kind,
                value = CASE lower(trim(kv_store.value))
                    WHEN 'light' THEN 'dark'
                    ELSE 'light'
                END,
                updated_at = excluded.updated_at
            RETURNING value
        "#,
        )
        .bind(THEME_KEY)
        .bind(ValueKind::Preference.as_str())
        .bind(current.toggled().as_str())
        .fetch_one(&self.pool)
        .await?;

        let next = ThemeVariant::from_str_name(&value).unwrap_or(ThemeVariant::Light);
        tracing::debug!(to = next.as_str(), "Theme toggled");
        Ok(next)
    }
}

#[cfg(test)]
mod tests {
    use crate::storage::{Database, THEME_KEY};
    use crate::theme::ThemeVariant;

    async fn test_db() -> Database {
        Database::open(":memory:").await.unwrap()
    }

    #[tokio::test]
    async fn test_get_preference_missing() {
        let db = test_db().await;
        let value = db.get_preference("nonexistent.key").await.unwrap();
        assert_eq!(value, None);
    }

    #[tokio::test]
    async fn test_set_preference_upsert() {
        let db = test_db().await;
        db.set_preference(THEME_KEY, "dark").await.unwrap();
        db.set_preference(THEME_KEY, "light").await.unwrap();

        let value = db.get_preference(THEME_KEY).await.unwrap();
        assert_eq!(value, Some("light".to_string()));
    }

    #[tokio::test]
    async fn test_toggle_twice_restores_stored_value() {
        let db = test_db().await;
        db.set_preference(THEME_KEY, "dark").await.unwrap();

        let first = db.toggle_theme(ThemeVariant::Dark).await.unwrap();
        assert_eq!(first, ThemeVariant::Light);
        let second = db.toggle_theme(first).await.unwrap();
        assert_eq!(second, ThemeVariant::Dark);

        assert_eq!(
            db.get_preference(THEME_KEY).await.unwrap().as_deref(),
            Some("dark")
        );
    }

    #[tokio::test]
    async fn test_toggle_without_stored_uses_current() {
        let db = test_db().await;
        let next = db.toggle_theme(ThemeVariant::Light).await.unwrap();
        assert_eq!(next, ThemeVariant::Dark);
        assert_eq!(db.stored_theme().await.unwrap(), Some(ThemeVariant::Dark));
    }

    #[tokio::test]
    async fn test_unknown_stored_theme_ignored() {
        let db = test_db().await;
        db.set_preference(THEME_KEY, "neon").await.unwrap();
        assert_eq!(db.stored_theme().await.unwrap(), None);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_toggles_restore_stored_value() {
        let db = test_db().await;
        db.set_preference(THEME_KEY, "dark").await.unwrap();

        for _ in 0..20 {
            let first = tokio::spawn({
                let db = db.clone();
                async move { db.toggle_theme(ThemeVariant::Dark).await }
            });
            let second = tokio::spawn({
                let db = db.clone();
                async move { db.toggle_theme(ThemeVariant::Dark).await }
            });
            let mut results = vec![
                first.await.unwrap().unwrap(),
                second.await.unwrap().unwrap(),
            ];
            results.sort_by_key(|v| v.as_str());
            assert_eq!(results, vec![ThemeVariant::Dark, ThemeVariant::Light]);
            assert_eq!(
                db.get_preference(THEME_KEY).await.unwrap().as_deref(),
                Some("dark")
            );
        }
    }
}
