use std::{collections::BTreeSet, sync::Arc};

use core_types::ItemId;
use sqlx::{Pool, Sqlite, SqliteConnection};

use crate::database_error::DatabaseError;

/// Key under which the set of locally trashed item ids is stored.
pub const TRASHED_IDS_KEY: &str = "trashed_photo_ids";

/// Durable record of item ids staged for deletion.
///
/// The ids are stored as a JSON array of decimal strings under a single key of
/// the `key_value` table. Every mutation reads, modifies and writes the set
/// inside one transaction, so a change is on disk when the call returns.
#[derive(Debug)]
pub struct TrashLedgerRepository {
    pool: Arc<Pool<Sqlite>>,
}

impl TrashLedgerRepository {
    pub fn new(pool: Arc<Pool<Sqlite>>) -> Self {
        Self { pool }
    }

    pub async fn get_trashed_ids(&self) -> Result<BTreeSet<ItemId>, DatabaseError> {
        let mut conn = self.pool.acquire().await?;
        read_ids(&mut conn).await
    }

    pub async fn add(&self, id: ItemId) -> Result<(), DatabaseError> {
        self.update_ids(|ids| {
            ids.insert(id);
        })
        .await
    }

    pub async fn remove(&self, id: ItemId) -> Result<(), DatabaseError> {
        self.update_ids(|ids| {
            ids.remove(&id);
        })
        .await
    }

    pub async fn clear(&self, ids_to_clear: &[ItemId]) -> Result<(), DatabaseError> {
        self.update_ids(|ids| {
            for id in ids_to_clear {
                ids.remove(id);
            }
        })
        .await
    }

    async fn update_ids<F>(&self, update: F) -> Result<(), DatabaseError>
    where
        F: FnOnce(&mut BTreeSet<ItemId>),
    {
        let mut tx = self.pool.begin().await?;
        let mut ids = read_ids(&mut tx).await?;
        update(&mut ids);

        let value = serde_json::to_string(&ids.iter().map(ItemId::to_string).collect::<Vec<_>>())?;
        sqlx::query(
            "INSERT INTO key_value (key, value)
             VALUES (?, ?)
             ON CONFLICT(key) DO UPDATE SET value = excluded.value",
        )
        .bind(TRASHED_IDS_KEY)
        .bind(value)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;
        tracing::debug!("Trash ledger now holds {} ids", ids.len());
        Ok(())
    }
}

async fn read_ids(conn: &mut SqliteConnection) -> Result<BTreeSet<ItemId>, DatabaseError> {
    let row: Option<(String,)> = sqlx::query_as("SELECT value FROM key_value WHERE key = ?")
        .bind(TRASHED_IDS_KEY)
        .fetch_optional(&mut *conn)
        .await?;

    let Some((value,)) = row else {
        return Ok(BTreeSet::new());
    };

    let entries: Vec<String> = serde_json::from_str(&value)?;
    let ids = entries
        .iter()
        .filter_map(|entry| match entry.parse::<ItemId>() {
            Ok(id) => Some(id),
            Err(e) => {
                tracing::warn!("Skipping unparsable trash ledger entry '{}': {}", entry, e);
                None
            }
        })
        .collect();
    Ok(ids)
}
