use std::str::FromStr;
use std::sync::OnceLock;

use regex::Regex;
use rust_decimal::Decimal;

use tally_core::{Categorizer, ExpenseRecord};

// ── Compiled regex cache ─────────────────────────────────────────────────────

macro_rules! re {
    ($name:ident, $pat:expr) => {
        fn $name() -> &'static Regex {
            static R: OnceLock<Regex> = OnceLock::new();
            R.get_or_init(|| Regex::new($pat).expect("invalid regex"))
        }
    };
}

// Strict two-decimal money pattern. Receipt OCR output is noisy; requiring
// exactly two fractional digits keeps item codes and quantities from being
// read as amounts, at the cost of missing integer-amount lines. A leading
// minus is part of the token so refunds are seen as negative and dropped by
// the positivity check rather than read as positive charges.
re!(re_money, r"-?\$?\d+\.\d{2}");

// ── Public extraction API ─────────────────────────────────────────────────────

/// Turn raw OCR text into categorized expense records, one per line carrying
/// a money amount.
///
/// Never fails. Lines without the money pattern are skipped, as are lines
/// whose description is empty after stripping the amount or whose amount is
/// not strictly positive.
pub fn extract_expenses(raw_text: &str, categorizer: &Categorizer) -> Vec<ExpenseRecord> {
    raw_text
        .lines()
        .filter_map(|line| extract_line(line, categorizer))
        .collect()
}

fn extract_line(line: &str, categorizer: &Categorizer) -> Option<ExpenseRecord> {
    let token = re_money().find(line)?;
    let amount = Decimal::from_str(&token.as_str().replace('$', "")).ok()?;

    // The description is the line with every money token removed.
    let description = re_money().replace_all(line, "").trim().to_string();

    if description.is_empty() || amount <= Decimal::ZERO {
        return None;
    }

    Some(ExpenseRecord::categorized(description, amount, categorizer))
}
