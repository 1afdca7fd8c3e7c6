use std::collections::HashSet;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use core_types::{Item, ItemId, Locator};

use crate::{catalog::ItemCatalog, error::Error};

#[derive(Default)]
struct MockState {
    ids: Vec<ItemId>,
    system_trash: Vec<Item>,
    missing_ids: HashSet<ItemId>,
    fail_listing: bool,
    fail_resolve: bool,
    list_calls: usize,
    resolve_calls: usize,
}

/// Mock implementation of ItemCatalog for testing
///
/// Locators are derived from the id as `mock://item/<id>`.
#[derive(Clone, Default)]
pub struct MockCatalog {
    state: Arc<Mutex<MockState>>,
}

impl MockCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_ids(ids: &[i64]) -> Self {
        let catalog = Self::new();
        catalog.set_ids(ids);
        catalog
    }

    pub fn locator_for(id: ItemId) -> Locator {
        Locator::new(format!("mock://item/{}", id))
    }

    pub fn item(id: i64) -> Item {
        let id = ItemId::new(id);
        Item::new(id, Self::locator_for(id))
    }

    pub fn set_ids(&self, ids: &[i64]) {
        self.state.lock().unwrap().ids = ids.iter().copied().map(ItemId::new).collect();
    }

    pub fn set_system_trash(&self, items: Vec<Item>) {
        self.state.lock().unwrap().system_trash = items;
    }

    /// Make resolve_location report the item as gone
    pub fn mark_missing(&self, id: i64) {
        self.state
            .lock()
            .unwrap()
            .missing_ids
            .insert(ItemId::new(id));
    }

    pub fn fail_listing(&self, fail: bool) {
        self.state.lock().unwrap().fail_listing = fail;
    }

    pub fn fail_resolve(&self, fail: bool) {
        self.state.lock().unwrap().fail_resolve = fail;
    }

    pub fn list_calls(&self) -> usize {
        self.state.lock().unwrap().list_calls
    }

    pub fn resolve_calls(&self) -> usize {
        self.state.lock().unwrap().resolve_calls
    }
}

#[async_trait]
impl ItemCatalog for MockCatalog {
    async fn list_all_item_ids(&self) -> Result<Vec<ItemId>, Error> {
        let mut state = self.state.lock().unwrap();
        state.list_calls += 1;
        if state.fail_listing {
            return Err(Error::CatalogError("Simulated listing failure".to_string()));
        }
        Ok(state.ids.clone())
    }

    async fn resolve_location(&self, id: ItemId) -> Result<Locator, Error> {
        let mut state = self.state.lock().unwrap();
        state.resolve_calls += 1;
        if state.fail_resolve {
            return Err(Error::CatalogError("Simulated resolve failure".to_string()));
        }
        if state.missing_ids.contains(&id) {
            return Err(Error::ItemNotFound(id));
        }
        Ok(Self::locator_for(id))
    }

    async fn list_system_trash(&self) -> Result<Vec<Item>, Error> {
        let state = self.state.lock().unwrap();
        if state.fail_listing {
            return Err(Error::CatalogError("Simulated listing failure".to_string()));
        }
        Ok(state.system_trash.clone())
    }
}
