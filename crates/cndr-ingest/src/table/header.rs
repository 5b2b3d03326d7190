//! Header row parsing.

use std::path::Path;

use ::csv::ReaderBuilder;

use crate::error::{IngestError, Result};

/// Normalizes a header value by trimming whitespace and a leading BOM.
fn normalize_header(value: &str) -> String {
    value.trim_start_matches('\u{feff}').trim().to_string()
}

/// Reads the header row of a delimited file.
pub fn read_csv_schema(path: &Path, separator: u8) -> Result<Vec<String>> {
    let mut reader = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .delimiter(separator)
        .from_path(path)
        .map_err(|e| map_csv_error(path, e))?;

    let Some(record) = reader.records().next() else {
        return Err(IngestError::EmptyCsv {
            path: path.to_path_buf(),
        });
    };
    let record = record.map_err(|e| map_csv_error(path, e))?;
    let columns: Vec<String> = record.iter().map(normalize_header).collect();

    if columns.iter().all(String::is_empty) {
        return Err(IngestError::NoHeaderDetected {
            path: path.to_path_buf(),
        });
    }
    Ok(columns)
}

fn map_csv_error(path: &Path, err: ::csv::Error) -> IngestError {
    if err.is_io_error() {
        if let ::csv::ErrorKind::Io(io) = err.into_kind() {
            return if io.kind() == std::io::ErrorKind::NotFound {
                IngestError::FileNotFound {
                    path: path.to_path_buf(),
                }
            } else {
                IngestError::FileRead {
                    path: path.to_path_buf(),
                    source: io,
                }
            };
        }
        return IngestError::CsvParse {
            path: path.to_path_buf(),
            message: "I/O error".to_string(),
        };
    }
    IngestError::CsvParse {
        path: path.to_path_buf(),
        message: err.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn create_temp_csv(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, "{}", content).unwrap();
        file
    }

    #[test]
    fn test_normalize_header() {
        assert_eq!(normalize_header("  INDDID  "), "INDDID");
        assert_eq!(normalize_header("\u{feff}INDDID"), "INDDID");
    }

    #[test]
    fn test_read_csv_schema() {
        let file = create_temp_csv("INDDID,NPDx1,AmygTau\n100,Alzheimer's disease,1+\n");
        let headers = read_csv_schema(file.path(), b',').unwrap();
        assert_eq!(headers, vec!["INDDID", "NPDx1", "AmygTau"]);
    }

    #[test]
    fn test_read_csv_schema_quoted_and_tab_separated() {
        let file = create_temp_csv("\"INDDID\"\t\"Braak06\"\n1\t4\n");
        let headers = read_csv_schema(file.path(), b'\t').unwrap();
        assert_eq!(headers, vec!["INDDID", "Braak06"]);
    }

    #[test]
    fn test_read_csv_schema_empty_file() {
        let file = create_temp_csv("");
        let result = read_csv_schema(file.path(), b',');
        assert!(matches!(result, Err(IngestError::EmptyCsv { .. })));
    }

    #[test]
    fn test_read_csv_schema_missing_file() {
        let result = read_csv_schema(Path::new("/nonexistent/inquery.csv"), b',');
        assert!(matches!(result, Err(IngestError::FileNotFound { .. })));
    }
}
