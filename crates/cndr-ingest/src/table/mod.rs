//! Delimited-text and workbook reading, delimited-text writing.

mod header;
mod reader;
mod workbook;
mod writer;

pub use header::read_csv_schema;
pub use reader::{LoadOptions, read_table};
pub use workbook::{WORKBOOK_EXTENSIONS, is_workbook};
pub use writer::write_table;
