//! Table loading with the fixed column typing.

use std::path::Path;
use std::sync::Arc;

use chrono::Datelike;
use polars::prelude::*;

use cndr_model::columns;

use super::header::read_csv_schema;
use super::workbook::{is_workbook, read_workbook};
use crate::dates::{DATE_COLUMNS, parse_date};
use crate::error::{IngestError, Result};

/// Days between 0001-01-01 (CE day 1) and 1970-01-01.
const UNIX_EPOCH_DAYS_FROM_CE: i32 = 719_163;

/// Options for [`read_table`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoadOptions {
    /// Field separator byte. Ignored for workbooks.
    pub separator: u8,
    /// Rows scanned when inferring column types; `None` scans every row.
    pub infer_schema_length: Option<usize>,
}

impl Default for LoadOptions {
    fn default() -> Self {
        Self {
            separator: b',',
            infer_schema_length: None,
        }
    }
}

impl LoadOptions {
    #[must_use]
    pub fn with_separator(mut self, separator: u8) -> Self {
        self.separator = separator;
        self
    }

    #[must_use]
    pub fn with_infer_schema_length(mut self, rows: Option<usize>) -> Self {
        self.infer_schema_length = rows;
        self
    }
}

/// Reads an export into a `DataFrame`.
///
/// Workbooks (see [`is_workbook`]) are read from their first sheet, anything
/// else as delimited text. Column types are inferred from every row by
/// default, so a numeric column that later holds `Unknown` loads as text.
///
/// `INDDID` is read as text so identifiers keep leading zeros.
/// `FlywheelSessionDate` and `AutopsyDate` become `Date` columns; a value in
/// either that is not a recognised date fails the load.
pub fn read_table(path: &Path, options: &LoadOptions) -> Result<DataFrame> {
    let mut df = if is_workbook(path) {
        read_workbook(path)?
    } else {
        read_delimited(path, options)?
    };

    for name in DATE_COLUMNS {
        if df.column(name).is_ok() {
            let dates = date_column(&df, name)?;
            df.with_column(dates)?;
        }
    }

    tracing::debug!(
        path = %path.display(),
        rows = df.height(),
        columns = df.width(),
        "Loaded table"
    );
    Ok(df)
}

fn read_delimited(path: &Path, options: &LoadOptions) -> Result<DataFrame> {
    let headers = read_csv_schema(path, options.separator)?;

    let mut overwrite = Schema::with_capacity(1 + DATE_COLUMNS.len());
    for name in std::iter::once(columns::INDDID).chain(DATE_COLUMNS) {
        if headers.iter().any(|header| header == name) {
            overwrite.with_column(name.into(), DataType::String);
        }
    }

    CsvReadOptions::default()
        .with_has_header(true)
        .with_infer_schema_length(options.infer_schema_length)
        .with_schema_overwrite(Some(Arc::new(overwrite)))
        .map_parse_options(|parse| parse.with_separator(options.separator))
        .try_into_reader_with_file_path(Some(path.to_path_buf()))
        .map_err(|e| IngestError::CsvParse {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?
        .finish()
        .map_err(|e| IngestError::CsvParse {
            path: path.to_path_buf(),
            message: e.to_string(),
        })
}

/// Converts a text column of dates into a Polars `Date` column.
fn date_column(df: &DataFrame, name: &str) -> Result<Column> {
    let text = df.column(name)?.cast(&DataType::String)?;
    let values = text.str()?;
    let mut days: Vec<Option<i32>> = Vec::with_capacity(values.len());
    for (row, cell) in values.into_iter().enumerate() {
        match cell.map(str::trim) {
            None | Some("") => days.push(None),
            Some(raw) => {
                let date = parse_date(raw).ok_or_else(|| IngestError::InvalidDate {
                    column: name.to_string(),
                    row,
                    value: raw.to_string(),
                })?;
                days.push(Some(date.num_days_from_ce() - UNIX_EPOCH_DAYS_FROM_CE));
            }
        }
    }
    let column = Series::new(name.into(), days)
        .cast(&DataType::Date)?
        .into_column();
    Ok(column)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::{Builder, NamedTempFile};

    fn create_temp_csv(content: &str) -> NamedTempFile {
        let mut file = Builder::new().suffix(".csv").tempfile().unwrap();
        write!(file, "{}", content).unwrap();
        file
    }

    #[test]
    fn test_inddid_stays_text() {
        let file = create_temp_csv("INDDID,Braak06\n00123,4\n456,2\n");
        let df = read_table(file.path(), &LoadOptions::default()).unwrap();

        let ids = df.column("INDDID").unwrap().str().unwrap();
        assert_eq!(ids.get(0), Some("00123"));
        assert_eq!(ids.get(1), Some("456"));
        assert_eq!(df.column("Braak06").unwrap().dtype(), &DataType::Int64);
    }

    #[test]
    fn test_date_columns_are_dates() {
        let file = create_temp_csv(
            "INDDID,AutopsyDate,FlywheelSessionDate\n1,2019-04-30,05/01/2018\n2,,\n",
        );
        let df = read_table(file.path(), &LoadOptions::default()).unwrap();

        assert_eq!(df.column("AutopsyDate").unwrap().dtype(), &DataType::Date);
        assert_eq!(
            df.column("FlywheelSessionDate").unwrap().dtype(),
            &DataType::Date
        );
        let autopsy = df.column("AutopsyDate").unwrap();
        assert_eq!(autopsy.null_count(), 1);
    }

    #[test]
    fn test_invalid_date_fails() {
        let file = create_temp_csv("INDDID,AutopsyDate\n1,someday\n");
        let result = read_table(file.path(), &LoadOptions::default());
        assert!(matches!(
            result,
            Err(IngestError::InvalidDate { row: 0, .. })
        ));
    }

    #[test]
    fn test_types_inferred_from_every_row() {
        let mut content = String::from("INDDID,Braak06\n");
        for id in 0..150 {
            content.push_str(&format!("{id},4\n"));
        }
        content.push_str("999,Unknown\n");
        let file = create_temp_csv(&content);

        let df = read_table(file.path(), &LoadOptions::default()).unwrap();
        let braak = df.column("Braak06").unwrap().str().unwrap();
        assert_eq!(braak.get(0), Some("4"));
        assert_eq!(braak.get(150), Some("Unknown"));

        let limited = LoadOptions::default().with_infer_schema_length(Some(100));
        assert!(read_table(file.path(), &limited).is_err());
    }

    #[test]
    fn test_tab_separated() {
        let file = create_temp_csv("INDDID\tNPDx1\n7\tAlzheimer's disease\n");
        let options = LoadOptions::default().with_separator(b'\t');
        let df = read_table(file.path(), &options).unwrap();
        assert_eq!(df.width(), 2);
        assert_eq!(
            df.column("NPDx1").unwrap().str().unwrap().get(0),
            Some("Alzheimer's disease")
        );
    }
}
