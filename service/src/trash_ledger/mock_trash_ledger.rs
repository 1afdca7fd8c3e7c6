use std::collections::BTreeSet;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use core_types::ItemId;

use crate::{error::Error, trash_ledger::TrashLedger};

#[derive(Default)]
struct MockState {
    ids: BTreeSet<ItemId>,
    fail_writes: bool,
    write_calls: usize,
}

/// Mock implementation of TrashLedger for testing
///
/// Keeps the ids in memory. Writes can be made to fail to simulate a broken
/// storage backend.
#[derive(Clone, Default)]
pub struct MockTrashLedger {
    state: Arc<Mutex<MockState>>,
}

impl MockTrashLedger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_ids(ids: &[i64]) -> Self {
        let ledger = Self::new();
        ledger.state.lock().unwrap().ids = ids.iter().copied().map(ItemId::new).collect();
        ledger
    }

    pub fn fail_writes(&self, fail: bool) {
        self.state.lock().unwrap().fail_writes = fail;
    }

    pub fn ids(&self) -> BTreeSet<ItemId> {
        self.state.lock().unwrap().ids.clone()
    }

    pub fn contains(&self, id: i64) -> bool {
        self.state.lock().unwrap().ids.contains(&ItemId::new(id))
    }

    pub fn write_calls(&self) -> usize {
        self.state.lock().unwrap().write_calls
    }

    fn write<F>(&self, update: F) -> Result<(), Error>
    where
        F: FnOnce(&mut BTreeSet<ItemId>),
    {
        let mut state = self.state.lock().unwrap();
        state.write_calls += 1;
        if state.fail_writes {
            return Err(Error::DbError("Simulated ledger write failure".to_string()));
        }
        update(&mut state.ids);
        Ok(())
    }
}

#[async_trait]
impl TrashLedger for MockTrashLedger {
    async fn get_trashed_ids(&self) -> Result<BTreeSet<ItemId>, Error> {
        Ok(self.ids())
    }

    async fn add(&self, id: ItemId) -> Result<(), Error> {
        self.write(|ids| {
            ids.insert(id);
        })
    }

    async fn remove(&self, id: ItemId) -> Result<(), Error> {
        self.write(|ids| {
            ids.remove(&id);
        })
    }

    async fn clear(&self, ids_to_clear: &[ItemId]) -> Result<(), Error> {
        self.write(|ids| {
            for id in ids_to_clear {
                ids.remove(id);
            }
        })
    }
}
