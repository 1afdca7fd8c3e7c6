use std::{collections::BTreeSet, sync::Arc};

use core_types::ItemId;

use crate::{catalog::ItemCatalog, trash_ledger::TrashLedger};

/// Context object that flows through the session load pipeline
pub struct SessionLoadContext {
    pub catalog: Arc<dyn ItemCatalog>,
    pub ledger: Arc<dyn TrashLedger>,

    // Accumulated state as pipeline progresses
    pub all_ids: Vec<ItemId>,
    pub trashed_ids: BTreeSet<ItemId>,
    /// Ids not staged for deletion, shuffled by the last step
    pub available_ids: Vec<ItemId>,
}

impl SessionLoadContext {
    pub fn new(catalog: Arc<dyn ItemCatalog>, ledger: Arc<dyn TrashLedger>) -> Self {
        Self {
            catalog,
            ledger,
            all_ids: Vec::new(),
            trashed_ids: BTreeSet::new(),
            available_ids: Vec::new(),
        }
    }
}
