//! Spreadsheet loading through calamine.

use std::path::Path;

use calamine::{Data, Reader, open_workbook_auto};
use polars::prelude::*;

use cndr_common::format_numeric;
use cndr_model::columns;

use crate::dates::DATE_COLUMNS;
use crate::error::{IngestError, Result};

/// Extensions read as workbooks; everything else is delimited text.
pub const WORKBOOK_EXTENSIONS: [&str; 5] = ["xlsx", "xlsm", "xlsb", "xls", "ods"];

/// Returns true if `path` has a workbook extension (case-insensitive).
pub fn is_workbook(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| {
            WORKBOOK_EXTENSIONS
                .iter()
                .any(|known| ext.eq_ignore_ascii_case(known))
        })
}

/// Reads the first sheet of a workbook; the first row is the header.
///
/// `INDDID` and the date columns come back as text for the shared typing
/// pass. Other columns are `Int64`, `Float64` or `Boolean` when every
/// non-empty cell has that kind, and text otherwise.
pub fn read_workbook(path: &Path) -> Result<DataFrame> {
    if !path.exists() {
        return Err(IngestError::FileNotFound {
            path: path.to_path_buf(),
        });
    }
    let mut workbook = open_workbook_auto(path).map_err(|e| IngestError::Workbook {
        path: path.to_path_buf(),
        message: e.to_string(),
    })?;
    let range = workbook
        .worksheet_range_at(0)
        .ok_or_else(|| IngestError::EmptyWorkbook {
            path: path.to_path_buf(),
        })?
        .map_err(|e| IngestError::Workbook {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;

    let mut rows = range.rows();
    let Some(header) = rows.next() else {
        return Err(IngestError::EmptyWorkbook {
            path: path.to_path_buf(),
        });
    };
    let names: Vec<String> = header
        .iter()
        .enumerate()
        .map(|(idx, cell)| {
            let name = cell_text(cell).unwrap_or_default().trim().to_string();
            if name.is_empty() {
                format!("column_{}", idx + 1)
            } else {
                name
            }
        })
        .collect();
    if header.iter().all(|cell| cell_text(cell).is_none()) {
        return Err(IngestError::NoHeaderDetected {
            path: path.to_path_buf(),
        });
    }

    let body: Vec<&[Data]> = rows.collect();
    let columns = names
        .iter()
        .enumerate()
        .map(|(idx, name)| {
            let cells: Vec<&Data> = body.iter().map(|row| &row[idx]).collect();
            sheet_column(name, &cells)
        })
        .collect();
    let df = DataFrame::new(columns)?;
    tracing::debug!(
        path = %path.display(),
        rows = df.height(),
        columns = df.width(),
        "Read workbook sheet"
    );
    Ok(df)
}

fn sheet_column(name: &str, cells: &[&Data]) -> Column {
    let forced_text = name == columns::INDDID || DATE_COLUMNS.contains(&name);
    let present: Vec<&Data> = cells
        .iter()
        .copied()
        .filter(|cell| cell_text(cell).is_some())
        .collect();

    let column = if forced_text {
        text_series(name, cells)
    } else if present.iter().all(|cell| matches!(cell, Data::Int(_))) {
        let values: Vec<Option<i64>> = cells
            .iter()
            .map(|cell| match cell {
                Data::Int(value) => Some(*value),
                _ => None,
            })
            .collect();
        Series::new(name.into(), values)
    } else if present
        .iter()
        .all(|cell| matches!(cell, Data::Int(_) | Data::Float(_)))
    {
        let values: Vec<Option<f64>> = cells
            .iter()
            .map(|cell| match cell {
                Data::Int(value) => Some(*value as f64),
                Data::Float(value) => Some(*value).filter(|v| !v.is_nan()),
                _ => None,
            })
            .collect();
        if values.iter().flatten().all(|v| v.fract() == 0.0 && v.abs() < 1e15) {
            let whole: Vec<Option<i64>> = values.iter().map(|v| v.map(|v| v as i64)).collect();
            Series::new(name.into(), whole)
        } else {
            Series::new(name.into(), values)
        }
    } else if present.iter().all(|cell| matches!(cell, Data::Bool(_))) {
        let values: Vec<Option<bool>> = cells
            .iter()
            .map(|cell| match cell {
                Data::Bool(value) => Some(*value),
                _ => None,
            })
            .collect();
        Series::new(name.into(), values)
    } else {
        text_series(name, cells)
    };
    column.into_column()
}

fn text_series(name: &str, cells: &[&Data]) -> Series {
    let values: Vec<Option<String>> = cells.iter().map(|cell| cell_text(cell)).collect();
    Series::new(name.into(), values)
}

/// Text of one cell; empty and error cells are `None`.
fn cell_text(cell: &Data) -> Option<String> {
    let text = match cell {
        Data::Empty | Data::Error(_) => return None,
        Data::String(value) => value.clone(),
        Data::Int(value) => value.to_string(),
        Data::Float(value) if value.is_nan() => return None,
        Data::Float(value) => format_numeric(*value),
        Data::Bool(value) => if *value { "TRUE" } else { "FALSE" }.to_string(),
        Data::DateTime(value) => match value.as_datetime() {
            Some(datetime) => datetime.format("%Y-%m-%d %H:%M:%S").to_string(),
            None => format_numeric(value.as_f64()),
        },
        Data::DateTimeIso(value) | Data::DurationIso(value) => value.clone(),
    };
    (!text.is_empty()).then_some(text)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_workbook() {
        assert!(is_workbook(Path::new("inquery.xlsx")));
        assert!(is_workbook(Path::new("INQUERY.XLSX")));
        assert!(is_workbook(Path::new("legacy.xls")));
        assert!(!is_workbook(Path::new("inquery.csv")));
        assert!(!is_workbook(Path::new("inquery")));
    }

    #[test]
    fn test_cell_text() {
        assert_eq!(cell_text(&Data::Empty), None);
        assert_eq!(cell_text(&Data::String(String::new())), None);
        assert_eq!(cell_text(&Data::Float(4.0)), Some("4".to_string()));
        assert_eq!(cell_text(&Data::Float(0.5)), Some("0.5".to_string()));
        assert_eq!(cell_text(&Data::Int(42)), Some("42".to_string()));
        assert_eq!(cell_text(&Data::String("Rare".into())), Some("Rare".to_string()));
    }

    #[test]
    fn test_sheet_column_kinds() {
        let whole = [Data::Float(4.0), Data::Empty, Data::Float(2.0)];
        let refs: Vec<&Data> = whole.iter().collect();
        assert_eq!(sheet_column("Braak06", &refs).dtype(), &DataType::Int64);

        let mixed = [Data::Float(1.0), Data::String("Rare".into())];
        let refs: Vec<&Data> = mixed.iter().collect();
        let column = sheet_column("AmygTau", &refs);
        assert_eq!(column.dtype(), &DataType::String);
        assert_eq!(column.str().unwrap().get(0), Some("1"));

        let ids = [Data::Float(123.0)];
        let refs: Vec<&Data> = ids.iter().collect();
        let column = sheet_column("INDDID", &refs);
        assert_eq!(column.str().unwrap().get(0), Some("123"));
    }

    #[test]
    fn test_missing_workbook() {
        let result = read_workbook(Path::new("/nonexistent/inquery.xlsx"));
        assert!(matches!(result, Err(IngestError::FileNotFound { .. })));
    }
}
