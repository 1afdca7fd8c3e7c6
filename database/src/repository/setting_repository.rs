use std::{collections::HashMap, sync::Arc};

use core_types::SettingName;
use sqlx::{Pool, Sqlite};

use crate::database_error::DatabaseError;

#[derive(Debug)]
pub struct SettingRepository {
    pool: Arc<Pool<Sqlite>>,
}

impl SettingRepository {
    pub fn new(pool: Arc<Pool<Sqlite>>) -> Self {
        Self { pool }
    }

    /// Returns every known setting keyed by its name. Keys that are not settings
    /// (for example the trash ledger) are left out.
    pub async fn get_settings(&self) -> Result<HashMap<String, String>, DatabaseError> {
        let rows: Vec<(String, String)> = sqlx::query_as("SELECT key, value FROM key_value")
            .fetch_all(&*self.pool)
            .await?;
        let settings = rows
            .into_iter()
            .filter(|(key, _)| key.parse::<SettingName>().is_ok())
            .collect();

        Ok(settings)
    }

    pub async fn get_setting(&self, key: &SettingName) -> Result<Option<String>, DatabaseError> {
        let row: Option<(String,)> = sqlx::query_as("SELECT value FROM key_value WHERE key = ?")
            .bind(key.as_str())
            .fetch_optional(&*self.pool)
            .await?;
        Ok(row.map(|(value,)| value))
    }

    pub async fn add_or_update_setting(
        &self,
        key: &SettingName,
        value: &str,
    ) -> Result<(), DatabaseError> {
        sqlx::query(
            "INSERT INTO key_value (key, value)
             VALUES (?, ?)
             ON CONFLICT(key) DO UPDATE SET value = excluded.value",
        )
        .bind(key.as_str())
        .bind(value)
        .execute(&*self.pool)
        .await?;
        Ok(())
    }

    pub async fn add_or_update_settings(
        &self,
        settings: &HashMap<SettingName, String>,
    ) -> Result<(), DatabaseError> {
        for (key, value) in settings {
            self.add_or_update_setting(key, value).await?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::{collections::HashMap, sync::Arc};

    use core_types::SettingName;

    use crate::setup_test_db;

    use super::SettingRepository;

    #[async_std::test]
    async fn test_get_settings() {
        let pool = Arc::new(setup_test_db().await);
        let repository = SettingRepository::new(pool.clone());

        assert_eq!(
            repository
                .get_setting(&SettingName::BufferCapacity)
                .await
                .unwrap(),
            None
        );

        repository
            .add_or_update_setting(&SettingName::BufferCapacity, "30")
            .await
            .unwrap();

        let settings = repository.get_settings().await.unwrap();
        assert_eq!(
            settings.get(SettingName::BufferCapacity.as_str()).unwrap(),
            "30"
        );

        repository
            .add_or_update_setting(&SettingName::BufferCapacity, "40")
            .await
            .unwrap();
        let setting = repository
            .get_setting(&SettingName::BufferCapacity)
            .await
            .unwrap();
        assert_eq!(setting.as_deref(), Some("40"));
    }

    #[async_std::test]
    async fn test_get_settings_ignores_foreign_keys() {
        let pool = Arc::new(setup_test_db().await);
        let repository = SettingRepository::new(pool.clone());

        sqlx::query("INSERT INTO key_value (key, value) VALUES ('trashed_photo_ids', '[]')")
            .execute(&*pool)
            .await
            .unwrap();
        repository
            .add_or_update_settings(&HashMap::from([
                (SettingName::PrefetchCount, "4".to_string()),
                (SettingName::LibraryRootDir, "/photos".to_string()),
            ]))
            .await
            .unwrap();

        let settings = repository.get_settings().await.unwrap();
        assert_eq!(settings.len(), 2);
        assert!(!settings.contains_key("trashed_photo_ids"));
    }
}
