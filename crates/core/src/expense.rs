use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::category::{Categorizer, Category};

/// A single normalized expense. Records are anonymous — no id, timestamp, or
/// owner — and immutable once built by an ingestor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExpenseRecord {
    pub description: String,
    pub amount: Decimal,
    pub category: Category,
}

impl ExpenseRecord {
    /// Build a record, assigning the category from the description.
    pub fn categorized(description: String, amount: Decimal, categorizer: &Categorizer) -> Self {
        let category = categorizer.categorize(&description);
        ExpenseRecord { description, amount, category }
    }
}
