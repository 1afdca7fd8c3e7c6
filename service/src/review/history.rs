use core_types::{Item, ItemId};

/// One keep or discard decision
#[derive(Debug, Clone, PartialEq)]
pub struct DecisionRecord {
    pub item: Item,
    pub was_discard: bool,
}

/// Stack of decisions made since the session was (re)shuffled.
#[derive(Debug, Default)]
pub struct UndoHistory {
    records: Vec<DecisionRecord>,
}

impl UndoHistory {
    pub fn push(&mut self, record: DecisionRecord) {
        self.records.push(record);
    }

    pub fn last(&self) -> Option<&DecisionRecord> {
        self.records.last()
    }

    pub fn pop(&mut self) -> Option<DecisionRecord> {
        self.records.pop()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn clear(&mut self) {
        self.records.clear();
    }

    /// Drops every record about the given items. Returns how many were dropped.
    pub fn remove_items(&mut self, ids: &[ItemId]) -> usize {
        let before = self.records.len();
        self.records.retain(|record| !ids.contains(&record.item.id));
        before - self.records.len()
    }
}
