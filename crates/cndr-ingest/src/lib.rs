//! Table loading for CNDR intake exports.
//!
//! Reads a delimited-text export or the first sheet of a workbook into a
//! Polars `DataFrame` and applies the fixed column typing the pipeline relies
//! on: `INDDID` stays text and the two date columns become calendar dates.
//! Everything else is inferred from every row.
//!
//! # Example
//!
//! ```ignore
//! use std::path::Path;
//! use cndr_ingest::{LoadOptions, read_table, write_table};
//!
//! let df = read_table(Path::new("inquery.csv"), &LoadOptions::default())?;
//! ```

mod dates;
mod error;
mod table;

// === Error Types ===
pub use error::{IngestError, Result};

// === Table Reading / Writing ===
pub use table::{
    LoadOptions, WORKBOOK_EXTENSIONS, is_workbook, read_csv_schema, read_table, write_table,
};

// === Date Parsing ===
pub use dates::{DATE_COLUMNS, parse_date};
