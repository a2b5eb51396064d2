//! Append-only record of completed rounds.

use crate::types::HistoryRecord;

pub struct HistoryStore {
    records: Vec<HistoryRecord>,
}

impl HistoryStore {
    pub fn new() -> Self {
        Self {
            records: Vec::new(),
        }
    }

    pub fn push(&mut self, record: HistoryRecord) {
        self.records.push(record);
    }

    pub fn records(&self) -> &[HistoryRecord] {
        &self.records
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
}

impl Default for HistoryStore {
    fn default() -> Self {
        Self::new()
    }
}
