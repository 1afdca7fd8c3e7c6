use std::collections::VecDeque;

use core_types::{Item, ItemId, Locator};

use crate::{catalog::ItemCatalog, error::Error};

/// Shuffled id pool and the window of resolved items ahead of the current one.
///
/// Items are taken from the front of the pool, resolved through the catalog
/// and appended to the back of the buffer. The buffer never holds more than
/// `capacity` items.
#[derive(Debug)]
pub struct LookaheadBuffer {
    capacity: usize,
    refill_threshold: usize,
    id_pool: VecDeque<ItemId>,
    items: VecDeque<Item>,
}

impl LookaheadBuffer {
    pub fn new(capacity: usize, refill_threshold: usize) -> Self {
        Self {
            capacity,
            refill_threshold,
            id_pool: VecDeque::new(),
            items: VecDeque::with_capacity(capacity),
        }
    }

    /// Replaces the pool with `ids` and drops all buffered items.
    pub fn reset(&mut self, ids: Vec<ItemId>) {
        self.items.clear();
        self.id_pool = ids.into();
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn remaining_in_pool(&self) -> usize {
        self.id_pool.len()
    }

    pub fn needs_refill(&self) -> bool {
        self.items.len() < self.refill_threshold
    }

    pub fn pop_front(&mut self) -> Option<Item> {
        self.items.pop_front()
    }

    /// Puts an item back in front of the buffer. When the buffer is full the
    /// last item is returned to the front of the pool unresolved.
    pub fn push_front(&mut self, item: Item) {
        let duplicate = self.items.iter().any(|buffered| buffered.id == item.id);
        debug_assert!(!duplicate, "item {} is already buffered", item.id);
        if duplicate {
            tracing::error!("Refusing to buffer item {} twice", item.id);
            return;
        }
        if self.items.len() >= self.capacity
            && let Some(evicted) = self.items.pop_back()
        {
            self.id_pool.push_front(evicted.id);
        }
        self.items.push_front(item);
    }

    /// Locators of the first `count` buffered items
    pub fn front_locators(&self, count: usize) -> Vec<Locator> {
        self.items
            .iter()
            .take(count)
            .map(|item| item.locator.clone())
            .collect()
    }

    /// Resolves ids from the pool until the buffer is full or the pool is
    /// exhausted. Returns the number of items added.
    ///
    /// Ids the catalog no longer knows are dropped. Any other catalog error
    /// puts the id back and is returned; items resolved before it stay.
    pub async fn fill(&mut self, catalog: &dyn ItemCatalog) -> Result<usize, Error> {
        let mut added = 0;
        while self.items.len() < self.capacity {
            let Some(id) = self.id_pool.pop_front() else {
                break;
            };
            match catalog.resolve_location(id).await {
                Ok(locator) => {
                    self.items.push_back(Item::new(id, locator));
                    added += 1;
                }
                Err(Error::ItemNotFound(_)) => {
                    tracing::warn!("Item {} disappeared from catalog, skipping", id);
                }
                Err(e) => {
                    self.id_pool.push_front(id);
                    return Err(e);
                }
            }
        }
        tracing::debug!(
            "Buffer filled with {} new items ({} buffered, {} in pool)",
            added,
            self.items.len(),
            self.id_pool.len()
        );
        Ok(added)
    }

    #[cfg(test)]
    pub fn buffered_ids(&self) -> Vec<ItemId> {
        self.items.iter().map(|item| item.id).collect()
    }
}
