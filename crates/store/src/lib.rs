use std::collections::BTreeMap;
use std::sync::RwLock;

use rust_decimal::Decimal;
use tally_core::{Category, ExpenseRecord};

/// Process-lifetime, in-memory expense collection.
///
/// State lives behind a single `RwLock`: mutators (`append`, `append_all`,
/// `clear`) take the write lock, readers (`list_all`, `summarize`) the read
/// lock, so every operation is atomic with respect to every other. The store
/// is created at startup and shared explicitly (via `Arc`); there is no
/// persistence, and all records are lost on restart.
#[derive(Debug, Default)]
pub struct ExpenseStore {
    records: RwLock<Vec<ExpenseRecord>>,
}

impl ExpenseStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn append(&self, record: ExpenseRecord) {
        self.records.write().unwrap().push(record);
    }

    pub fn append_all(&self, records: Vec<ExpenseRecord>) {
        self.records.write().unwrap().extend(records);
    }

    /// Snapshot of all records in insertion order.
    pub fn list_all(&self) -> Vec<ExpenseRecord> {
        self.records.read().unwrap().clone()
    }

    pub fn clear(&self) {
        self.records.write().unwrap().clear();
    }

    pub fn len(&self) -> usize {
        self.records.read().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Sum of amounts per category, over a single consistent snapshot.
    /// Categories with no records are absent from the result.
    pub fn summarize(&self) -> BTreeMap<Category, Decimal> {
        let records = self.records.read().unwrap();
        let mut summary = BTreeMap::new();
        for record in records.iter() {
            *summary.entry(record.category).or_insert(Decimal::ZERO) += record.amount;
        }
        summary
    }
}
