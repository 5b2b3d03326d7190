//! Writing the augmented table back to delimited text.

use std::fs::File;
use std::path::Path;

use polars::prelude::*;

use crate::error::{IngestError, Result};

/// Writes `df` as delimited text with a header row. Nulls become empty fields.
pub fn write_table(df: &mut DataFrame, path: &Path, separator: u8) -> Result<()> {
    let mut file = File::create(path).map_err(|e| IngestError::FileWrite {
        path: path.to_path_buf(),
        source: e,
    })?;
    CsvWriter::new(&mut file)
        .include_header(true)
        .with_separator(separator)
        .finish(df)?;
    tracing::debug!(path = %path.display(), rows = df.height(), "Wrote table");
    Ok(())
}
