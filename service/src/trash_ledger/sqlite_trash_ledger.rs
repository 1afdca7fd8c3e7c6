use std::{collections::BTreeSet, sync::Arc};

use async_trait::async_trait;
use core_types::ItemId;
use database::repository_manager::RepositoryManager;

use crate::{error::Error, trash_ledger::TrashLedger};

/// Trash ledger persisted in the application database.
#[derive(Debug)]
pub struct SqliteTrashLedger {
    repository_manager: Arc<RepositoryManager>,
}

impl SqliteTrashLedger {
    pub fn new(repository_manager: Arc<RepositoryManager>) -> Self {
        Self { repository_manager }
    }
}

#[async_trait]
impl TrashLedger for SqliteTrashLedger {
    async fn get_trashed_ids(&self) -> Result<BTreeSet<ItemId>, Error> {
        let ids = self
            .repository_manager
            .get_trash_ledger_repository()
            .get_trashed_ids()
            .await?;
        Ok(ids)
    }

    async fn add(&self, id: ItemId) -> Result<(), Error> {
        tracing::debug!(item_id = %id, "Adding item to trash ledger");
        self.repository_manager
            .get_trash_ledger_repository()
            .add(id)
            .await
            .map_err(|e| Error::DbError(format!("Failed to add {} to trash ledger: {}", id, e)))
    }

    async fn remove(&self, id: ItemId) -> Result<(), Error> {
        tracing::debug!(item_id = %id, "Removing item from trash ledger");
        self.repository_manager
            .get_trash_ledger_repository()
            .remove(id)
            .await
            .map_err(|e| {
                Error::DbError(format!("Failed to remove {} from trash ledger: {}", id, e))
            })
    }

    async fn clear(&self, ids: &[ItemId]) -> Result<(), Error> {
        tracing::info!("Clearing {} items from trash ledger", ids.len());
        self.repository_manager
            .get_trash_ledger_repository()
            .clear(ids)
            .await
            .map_err(|e| Error::DbError(format!("Failed to clear trash ledger: {}", e)))
    }
}
