use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::io::Read;
use std::str::FromStr;
use thiserror::Error;

use tally_core::{Categorizer, ExpenseRecord};

/// Column names accepted for the amount field, checked case-insensitively.
const AMOUNT_SYNONYMS: &[&str] = &["amount", "price", "cost", "value"];
/// Column names accepted for the description field.
const DESCRIPTION_SYNONYMS: &[&str] = &["description", "item", "name", "details"];

#[derive(Error, Debug)]
pub enum CsvError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
    #[error("Could not identify {0} column")]
    MissingColumn(&'static str),
    #[error("Invalid amount: '{0}'")]
    InvalidAmount(String),
    #[error("Empty description cell")]
    EmptyDescription,
}

/// How header names are matched to the logical amount/description fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HeaderMode {
    /// Accept any case-insensitive synonym (`amount`/`price`/`cost`/`value`,
    /// `description`/`item`/`name`/`details`); first matching column wins.
    #[default]
    SynonymSearch,
    /// Require headers named exactly `amount` and `description` after
    /// trimming and lowercasing.
    Strict,
}

#[derive(Debug, Clone, Default)]
pub struct CsvOptions {
    pub header_mode: HeaderMode,
}

/// Indices of the two columns every ingestion needs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResolvedColumns {
    pub amount: usize,
    pub description: usize,
}

/// Resolve amount/description columns from the header row, or fail with the
/// name of the first logical field that could not be found.
pub fn resolve_columns(
    headers: &csv::StringRecord,
    mode: HeaderMode,
) -> Result<ResolvedColumns, CsvError> {
    let find = |names: &[&str]| {
        headers.iter().position(|h| {
            let h = h.trim().to_lowercase();
            match mode {
                HeaderMode::SynonymSearch => names.contains(&h.as_str()),
                HeaderMode::Strict => h == names[0],
            }
        })
    };

    let amount = find(AMOUNT_SYNONYMS).ok_or(CsvError::MissingColumn("amount"))?;
    let description =
        find(DESCRIPTION_SYNONYMS).ok_or(CsvError::MissingColumn("description"))?;

    Ok(ResolvedColumns { amount, description })
}

/// Parse tabular input into categorized expense records.
///
/// All-or-nothing: a single unparseable amount cell or empty description
/// cell fails the whole batch, and nothing is returned. Fully blank rows are
/// skipped.
pub fn ingest_csv<R: Read>(
    data: R,
    options: &CsvOptions,
    categorizer: &Categorizer,
) -> Result<Vec<ExpenseRecord>, CsvError> {
    let mut reader = csv::ReaderBuilder::new().has_headers(true).from_reader(data);

    let headers = reader.headers()?.clone();
    let columns = resolve_columns(&headers, options.header_mode)?;

    let mut records = Vec::new();
    for result in reader.records() {
        let row = result?;
        if row.is_empty() || row.iter().all(|f| f.trim().is_empty()) {
            continue;
        }

        let amount_cell = row.get(columns.amount).unwrap_or_default();
        let amount = parse_amount(amount_cell)?;
        let description = row.get(columns.description).unwrap_or_default().to_string();
        if description.trim().is_empty() {
            return Err(CsvError::EmptyDescription);
        }

        records.push(ExpenseRecord::categorized(description, amount, categorizer));
    }

    Ok(records)
}

/// Parse a cell as a decimal amount, tolerating a leading `$`, thousands
/// commas, and surrounding whitespace.
fn parse_amount(s: &str) -> Result<Decimal, CsvError> {
    let clean = s.trim().replace([',', '$'], "");
    Decimal::from_str(&clean).map_err(|_| CsvError::InvalidAmount(s.to_string()))
}
