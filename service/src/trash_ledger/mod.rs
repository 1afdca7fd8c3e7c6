#[cfg(test)]
pub mod mock_trash_ledger;
pub mod sqlite_trash_ledger;

use std::collections::BTreeSet;

use async_trait::async_trait;
use core_types::ItemId;

use crate::error::Error;

/// Durable record of the item ids staged for deletion.
///
/// Every call completes its write before returning; the pipeline treats the
/// ledger as the source of truth for what is staged.
#[async_trait]
pub trait TrashLedger: Send + Sync {
    async fn get_trashed_ids(&self) -> Result<BTreeSet<ItemId>, Error>;

    async fn add(&self, id: ItemId) -> Result<(), Error>;

    async fn remove(&self, id: ItemId) -> Result<(), Error>;

    async fn clear(&self, ids: &[ItemId]) -> Result<(), Error>;
}
