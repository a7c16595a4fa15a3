use serde::{Deserialize, Serialize};
use thiserror::Error;

/// The closed set of expense categories. `Others` is the catch-all for
/// descriptions no keyword matches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Category {
    Food,
    Grocery,
    Transport,
    Shopping,
    Entertainment,
    Bills,
    Healthcare,
    Others,
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Category::Food => write!(f, "Food"),
            Category::Grocery => write!(f, "Grocery"),
            Category::Transport => write!(f, "Transport"),
            Category::Shopping => write!(f, "Shopping"),
            Category::Entertainment => write!(f, "Entertainment"),
            Category::Bills => write!(f, "Bills"),
            Category::Healthcare => write!(f, "Healthcare"),
            Category::Others => write!(f, "Others"),
        }
    }
}

impl std::str::FromStr for Category {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Food" => Ok(Category::Food),
            "Grocery" => Ok(Category::Grocery),
            "Transport" => Ok(Category::Transport),
            "Shopping" => Ok(Category::Shopping),
            "Entertainment" => Ok(Category::Entertainment),
            "Bills" => Ok(Category::Bills),
            "Healthcare" => Ok(Category::Healthcare),
            "Others" => Ok(Category::Others),
            other => Err(format!("Unknown category: '{other}'")),
        }
    }
}

#[derive(Debug, Error)]
pub enum TableError {
    #[error("Failed to parse keyword table TOML: {0}")]
    Toml(String),
    #[error("Unknown category in keyword table: '{0}'")]
    UnknownCategory(String),
}

/// One keyword table entry as it appears in a TOML override file.
#[derive(Debug, Deserialize)]
struct TableEntry {
    category: String,
    keywords: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct TableFile {
    table: Vec<TableEntry>,
}

/// An ordered mapping of category → lowercase keywords.
///
/// Entry order is the match order and is part of the contract: the first
/// category whose keyword appears in a description wins, so reordering the
/// table changes categorization results for descriptions that match keywords
/// from more than one category.
#[derive(Debug, Clone)]
pub struct KeywordTable {
    entries: Vec<(Category, Vec<String>)>,
}

impl KeywordTable {
    /// Load a table from TOML. Each `[[table]]` entry names a category and
    /// its keywords; file order becomes match order.
    pub fn from_toml(toml_content: &str) -> Result<Self, TableError> {
        let file: TableFile =
            toml::from_str(toml_content).map_err(|e| TableError::Toml(e.to_string()))?;
        let mut parsed = Vec::with_capacity(file.table.len());
        for entry in file.table {
            let category: Category = entry
                .category
                .parse()
                .map_err(|_| TableError::UnknownCategory(entry.category.clone()))?;
            let keywords = entry.keywords.iter().map(|k| k.to_lowercase()).collect();
            parsed.push((category, keywords));
        }
        Ok(KeywordTable { entries: parsed })
    }

    pub fn entries(&self) -> &[(Category, Vec<String>)] {
        &self.entries
    }
}

impl Default for KeywordTable {
    fn default() -> Self {
        let table: &[(Category, &[&str])] = &[
            (Category::Food, &["restaurant", "cafe", "coffee", "food", "pizza", "burger", "meal"]),
            (Category::Grocery, &["grocery", "supermarket", "mart", "vegetables", "fruits"]),
            (Category::Transport, &["uber", "taxi", "bus", "metro", "fuel", "petrol"]),
            (Category::Shopping, &["amazon", "flipkart", "clothing", "shoes", "electronics"]),
            (Category::Entertainment, &["movie", "cinema", "netflix", "spotify", "game"]),
            (Category::Bills, &["electricity", "water", "internet", "phone", "rent"]),
            (Category::Healthcare, &["hospital", "pharmacy", "medicine", "doctor"]),
        ];
        KeywordTable {
            entries: table
                .iter()
                .map(|(c, kws)| (*c, kws.iter().map(|k| k.to_string()).collect()))
                .collect(),
        }
    }
}

/// Assigns a category to a free-text description by substring keyword match.
#[derive(Debug, Clone, Default)]
pub struct Categorizer {
    table: KeywordTable,
}

impl Categorizer {
    pub fn new(table: KeywordTable) -> Self {
        Self { table }
    }

    /// Walk the table in order and return the first category with a keyword
    /// contained anywhere in the lowercased description. Containment is not
    /// word-bounded: "cafeteria" matches "cafe". Falls back to `Others`.
    pub fn categorize(&self, description: &str) -> Category {
        let text = description.to_lowercase();
        self.table
            .entries()
            .iter()
            .find(|(_, keywords)| keywords.iter().any(|kw| text.contains(kw.as_str())))
            .map(|(category, _)| *category)
            .unwrap_or(Category::Others)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keyword_match_returns_category() {
        let c = Categorizer::default();
        assert_eq!(c.categorize("Pizza Hut downtown"), Category::Food);
        assert_eq!(c.categorize("uber ride home"), Category::Transport);
        assert_eq!(c.categorize("Netflix subscription"), Category::Entertainment);
        assert_eq!(c.categorize("monthly rent"), Category::Bills);
        assert_eq!(c.categorize("CVS pharmacy"), Category::Healthcare);
    }

    #[test]
    fn match_is_case_insensitive() {
        let c = Categorizer::default();
        assert_eq!(c.categorize("AMAZON MARKETPLACE"), Category::Shopping);
    }

    #[test]
    fn substring_containment_not_word_boundary() {
        let c = Categorizer::default();
        // "cafeteria" contains "cafe"
        assert_eq!(c.categorize("office cafeteria"), Category::Food);
        // "walmart" contains "mart"
        assert_eq!(c.categorize("walmart run"), Category::Grocery);
    }

    #[test]
    fn first_table_entry_wins() {
        let c = Categorizer::default();
        // "food" (Food) and "supermarket" (Grocery) both match; Food is
        // earlier in the table.
        assert_eq!(c.categorize("food from the supermarket"), Category::Food);
    }

    #[test]
    fn empty_and_unmatched_default_to_others() {
        let c = Categorizer::default();
        assert_eq!(c.categorize(""), Category::Others);
        assert_eq!(c.categorize("xyz123"), Category::Others);
    }

    #[test]
    fn table_from_toml_preserves_file_order() {
        let toml = r#"
            [[table]]
            category = "Bills"
            keywords = ["rent"]

            [[table]]
            category = "Food"
            keywords = ["rent", "pizza"]
        "#;
        let c = Categorizer::new(KeywordTable::from_toml(toml).unwrap());
        // "rent" is registered under both; Bills comes first in this file.
        assert_eq!(c.categorize("rent payment"), Category::Bills);
        assert_eq!(c.categorize("pizza night"), Category::Food);
    }

    #[test]
    fn table_from_toml_lowercases_keywords() {
        let toml = r#"
            [[table]]
            category = "Shopping"
            keywords = ["AMAZON"]
        "#;
        let c = Categorizer::new(KeywordTable::from_toml(toml).unwrap());
        assert_eq!(c.categorize("amazon order"), Category::Shopping);
    }

    #[test]
    fn table_from_toml_rejects_unknown_category() {
        let toml = r#"
            [[table]]
            category = "Gadgets"
            keywords = ["gizmo"]
        "#;
        assert!(matches!(
            KeywordTable::from_toml(toml),
            Err(TableError::UnknownCategory(_))
        ));
    }

    #[test]
    fn category_display_from_str_roundtrip() {
        use std::str::FromStr;
        for c in [
            Category::Food,
            Category::Grocery,
            Category::Transport,
            Category::Shopping,
            Category::Entertainment,
            Category::Bills,
            Category::Healthcare,
            Category::Others,
        ] {
            assert_eq!(Category::from_str(&c.to_string()).unwrap(), c);
        }
    }
}
