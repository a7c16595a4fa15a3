pub mod csv;

pub use csv::{ingest_csv, resolve_columns, CsvError, CsvOptions, HeaderMode, ResolvedColumns};
