use core_types::{Item, ItemId, Locator};

/// Items discarded by the user and not yet resolved by a destructive
/// operation, in the order they were discarded. Holds each id at most once.
#[derive(Debug, Default)]
pub struct PendingDeleteSet {
    items: Vec<Item>,
}

impl PendingDeleteSet {
    /// Appends the item. Returns `false` and leaves the set unchanged when the
    /// id is already pending.
    pub fn insert(&mut self, item: Item) -> bool {
        if self.contains(item.id) {
            return false;
        }
        self.items.push(item);
        true
    }

    pub fn remove(&mut self, id: ItemId) -> Option<Item> {
        let index = self.items.iter().position(|item| item.id == id)?;
        Some(self.items.remove(index))
    }

    pub fn remove_all(&mut self, ids: &[ItemId]) {
        self.items.retain(|item| !ids.contains(&item.id));
    }

    /// Replaces the contents, dropping repeated ids.
    pub fn replace(&mut self, items: Vec<Item>) {
        self.items.clear();
        for item in items {
            self.insert(item);
        }
    }

    pub fn contains(&self, id: ItemId) -> bool {
        self.items.iter().any(|item| item.id == id)
    }

    pub fn items(&self) -> &[Item] {
        &self.items
    }

    pub fn ids(&self) -> Vec<ItemId> {
        self.items.iter().map(|item| item.id).collect()
    }

    pub fn locators(&self) -> Vec<Locator> {
        self.items.iter().map(|item| item.locator.clone()).collect()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}
