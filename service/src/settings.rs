use std::{collections::HashMap, path::PathBuf, str::FromStr, sync::Arc};

use core_types::SettingName;
use database::repository_manager::RepositoryManager;

use crate::error::Error;

pub const DEFAULT_BUFFER_CAPACITY: usize = 20;
pub const DEFAULT_REFILL_THRESHOLD: usize = 5;
pub const DEFAULT_PREFETCH_COUNT: usize = 8;
pub const DEFAULT_TRASH_RETENTION_DAYS: i64 = 30;
pub const MAX_TRASH_RETENTION_DAYS: i64 = 36_500;

/// Tuning and location settings of a review session.
#[derive(Debug, Clone, PartialEq)]
pub struct ReviewSettings {
    /// Target size of the lookahead buffer
    pub buffer_capacity: usize,
    /// The buffer is refilled when it holds fewer items than this
    pub refill_threshold: usize,
    /// How many buffered items are handed to the render cache
    pub prefetch_count: usize,
    pub library_root_dir: Option<PathBuf>,
    pub require_authorization: bool,
    pub trash_retention_days: i64,
}

impl Default for ReviewSettings {
    fn default() -> Self {
        Self {
            buffer_capacity: DEFAULT_BUFFER_CAPACITY,
            refill_threshold: DEFAULT_REFILL_THRESHOLD,
            prefetch_count: DEFAULT_PREFETCH_COUNT,
            library_root_dir: None,
            require_authorization: true,
            trash_retention_days: DEFAULT_TRASH_RETENTION_DAYS,
        }
    }
}

impl ReviewSettings {
    pub fn validate(&self) -> Result<(), Error> {
        if self.refill_threshold == 0 || self.refill_threshold >= self.buffer_capacity {
            return Err(Error::SettingsError(format!(
                "Refill threshold must be between 1 and {} (buffer capacity), got {}",
                self.buffer_capacity.saturating_sub(1),
                self.refill_threshold
            )));
        }
        if self.prefetch_count >= self.buffer_capacity {
            return Err(Error::SettingsError(format!(
                "Prefetch count must be less than buffer capacity {}, got {}",
                self.buffer_capacity, self.prefetch_count
            )));
        }
        if !(0..=MAX_TRASH_RETENTION_DAYS).contains(&self.trash_retention_days) {
            return Err(Error::SettingsError(format!(
                "Trash retention must be between 0 and {} days, got {}",
                MAX_TRASH_RETENTION_DAYS, self.trash_retention_days
            )));
        }
        Ok(())
    }

    pub fn to_setting_map(&self) -> HashMap<SettingName, String> {
        let mut map = HashMap::from([
            (SettingName::BufferCapacity, self.buffer_capacity.to_string()),
            (SettingName::RefillThreshold, self.refill_threshold.to_string()),
            (SettingName::PrefetchCount, self.prefetch_count.to_string()),
            (
                SettingName::RequireAuthorization,
                self.require_authorization.to_string(),
            ),
            (
                SettingName::TrashRetentionDays,
                self.trash_retention_days.to_string(),
            ),
        ]);
        if let Some(root) = &self.library_root_dir {
            // TODO: store paths that are not valid UTF-8 without loss
            map.insert(
                SettingName::LibraryRootDir,
                root.to_string_lossy().to_string(),
            );
        }
        map
    }
}

fn parse_or_default<T: FromStr>(map: &HashMap<String, String>, name: SettingName, default: T) -> T {
    match map.get(name.as_str()) {
        None => default,
        Some(value) => value.parse().unwrap_or_else(|_| {
            tracing::warn!(
                "Ignoring invalid value '{}' for setting {}",
                value,
                name.as_str()
            );
            default
        }),
    }
}

impl From<HashMap<String, String>> for ReviewSettings {
    fn from(map: HashMap<String, String>) -> Self {
        let defaults = ReviewSettings::default();
        Self {
            buffer_capacity: parse_or_default(
                &map,
                SettingName::BufferCapacity,
                defaults.buffer_capacity,
            ),
            refill_threshold: parse_or_default(
                &map,
                SettingName::RefillThreshold,
                defaults.refill_threshold,
            ),
            prefetch_count: parse_or_default(
                &map,
                SettingName::PrefetchCount,
                defaults.prefetch_count,
            ),
            library_root_dir: map
                .get(SettingName::LibraryRootDir.as_str())
                .map(PathBuf::from),
            require_authorization: parse_or_default(
                &map,
                SettingName::RequireAuthorization,
                defaults.require_authorization,
            ),
            trash_retention_days: parse_or_default(
                &map,
                SettingName::TrashRetentionDays,
                defaults.trash_retention_days,
            ),
        }
    }
}

/// Loads and saves review settings in the application database.
#[derive(Debug)]
pub struct SettingsService {
    repository_manager: Arc<RepositoryManager>,
}

impl SettingsService {
    pub fn new(repository_manager: Arc<RepositoryManager>) -> Self {
        Self { repository_manager }
    }

    pub async fn load_settings(&self) -> Result<ReviewSettings, Error> {
        let map = self
            .repository_manager
            .settings()
            .get_settings()
            .await
            .map_err(|e| Error::DbError(format!("Failed to load settings: {}", e)))?;
        Ok(ReviewSettings::from(map))
    }

    /// Validates and stores the settings.
    pub async fn save_settings(&self, settings: &ReviewSettings) -> Result<(), Error> {
        settings.validate()?;
        self.repository_manager
            .settings()
            .add_or_update_settings(&settings.to_setting_map())
            .await
            .map_err(|e| Error::DbError(format!("Failed to save settings: {}", e)))?;
        tracing::info!("Saved review settings");
        Ok(())
    }
}
