pub mod directory_catalog;
#[cfg(test)]
pub mod mock_catalog;

use async_trait::async_trait;
use core_types::{Item, ItemId, Locator};

use crate::error::Error;

/// Authoritative source of the photos that can be reviewed.
#[async_trait]
pub trait ItemCatalog: Send + Sync {
    /// Every reviewable item id. The order is stable within one call.
    async fn list_all_item_ids(&self) -> Result<Vec<ItemId>, Error>;

    /// Resolves the locator for an id. Fails with [`Error::ItemNotFound`] when
    /// the item no longer exists.
    async fn resolve_location(&self, id: ItemId) -> Result<Locator, Error>;

    /// Resolves several ids, one result per id in the same order. The outer
    /// error is reserved for failures that affect the whole batch.
    async fn resolve_locations(
        &self,
        ids: &[ItemId],
    ) -> Result<Vec<Result<Locator, Error>>, Error> {
        let mut results = Vec::with_capacity(ids.len());
        for id in ids {
            results.push(self.resolve_location(*id).await);
        }
        Ok(results)
    }

    /// Items currently in system trash, with their purge time.
    async fn list_system_trash(&self) -> Result<Vec<Item>, Error>;
}
