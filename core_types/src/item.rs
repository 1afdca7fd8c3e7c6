use std::{
    fmt::{Display, Formatter},
    path::{Path, PathBuf},
    str::FromStr,
};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::CoreTypeError;

/// Identifier of a photo in the catalog. Stable across process restarts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ItemId(i64);

impl ItemId {
    pub fn new(value: i64) -> Self {
        Self(value)
    }

    pub fn value(&self) -> i64 {
        self.0
    }
}

impl From<i64> for ItemId {
    fn from(value: i64) -> Self {
        Self(value)
    }
}

impl Display for ItemId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for ItemId {
    type Err = CoreTypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim().parse::<i64>().map(ItemId).map_err(|e| {
            CoreTypeError::ConversionError(format!("Failed to parse item id '{}': {}", s, e))
        })
    }
}

/// Reference the destructive operation gateway can act on. For local libraries
/// this is the file path.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Locator(String);

impl Locator {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn from_path(path: &Path) -> Self {
        Self(path.to_string_lossy().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn to_path_buf(&self) -> PathBuf {
        PathBuf::from(&self.0)
    }
}

impl Display for Locator {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

const SECONDS_PER_DAY: i64 = 60 * 60 * 24;

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Item {
    pub id: ItemId,
    pub locator: Locator,
    /// Moment the item is purged from system trash. Only set for items that are
    /// already in system trash.
    pub expires_at: Option<DateTime<Utc>>,
}

impl Item {
    pub fn new(id: ItemId, locator: Locator) -> Self {
        Self {
            id,
            locator,
            expires_at: None,
        }
    }

    pub fn in_system_trash(id: ItemId, locator: Locator, expires_at: DateTime<Utc>) -> Self {
        Self {
            id,
            locator,
            expires_at: Some(expires_at),
        }
    }

    /// Whole days left before the item is purged from system trash, never negative.
    pub fn days_until_purge(&self, now: DateTime<Utc>) -> Option<i64> {
        self.expires_at
            .map(|expires_at| ((expires_at - now).num_seconds() / SECONDS_PER_DAY).max(0))
    }
}

#[cfg(test)]
mod tests {
    use chrono::{Duration, TimeZone};

    use super::*;

    #[test]
    fn test_parse_item_id() {
        assert_eq!("42".parse::<ItemId>().unwrap(), ItemId::new(42));
        assert_eq!(" -7 ".parse::<ItemId>().unwrap(), ItemId::new(-7));
        assert!("abc".parse::<ItemId>().is_err());
    }

    #[test]
    fn test_days_until_purge() {
        let now = Utc.with_ymd_and_hms(2025, 1, 1, 12, 0, 0).unwrap();
        let locator = Locator::new("/trash/files/a.jpg");

        let item = Item::in_system_trash(ItemId::new(1), locator.clone(), now + Duration::hours(49));
        assert_eq!(item.days_until_purge(now), Some(2));

        let expired = Item::in_system_trash(ItemId::new(2), locator.clone(), now - Duration::days(3));
        assert_eq!(expired.days_until_purge(now), Some(0));

        let not_trashed = Item::new(ItemId::new(3), locator);
        assert_eq!(not_trashed.days_until_purge(now), None);
    }
}
