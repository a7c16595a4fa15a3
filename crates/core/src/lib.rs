pub mod category;
pub mod expense;

pub use category::{Categorizer, Category, KeywordTable, TableError};
pub use expense::ExpenseRecord;
