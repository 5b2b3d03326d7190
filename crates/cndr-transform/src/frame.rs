//! Column access helpers shared by the stages.

use cndr_common::any_to_f64;
use polars::prelude::*;

use crate::error::{Result, TransformError};

/// Returns true if `df` has a column named exactly `name`.
pub fn has_column(df: &DataFrame, name: &str) -> bool {
    df.get_column_index(name).is_some()
}

/// Returns the names in `required` that `df` lacks, in order.
pub fn missing_columns<'a>(df: &DataFrame, required: &[&'a str]) -> Vec<&'a str> {
    required
        .iter()
        .copied()
        .filter(|name| !has_column(df, name))
        .collect()
}

/// Reads a column as numbers.
///
/// Null, NaN and text that is not a number all read as `None`.
pub fn numeric_values(df: &DataFrame, name: &str) -> Result<Vec<Option<f64>>> {
    let column = df.column(name)?;
    let mut values = Vec::with_capacity(column.len());
    for idx in 0..column.len() {
        values.push(any_to_f64(column.get(idx)?));
    }
    Ok(values)
}

/// Reads a column that must hold numbers.
///
/// Null, NaN, empty text and any of `missing_tokens` read as `None`. Any
/// other text that is not a number fails with
/// [`TransformError::MalformedInput`], as does a column that is neither text
/// nor numeric.
pub fn measured_values(
    df: &DataFrame,
    name: &str,
    missing_tokens: &[&str],
) -> Result<Vec<Option<f64>>> {
    let column = df.column(name)?;
    let dtype = column.dtype();
    if matches!(dtype, DataType::Null) || dtype.is_float() || dtype.is_integer() {
        return numeric_values(df, name);
    }
    if !matches!(dtype, DataType::String) {
        return Err(TransformError::malformed_dtype(name, dtype));
    }

    let mut values = Vec::with_capacity(column.len());
    for (row, cell) in column.str()?.into_iter().enumerate() {
        let value = match cell.map(str::trim) {
            None | Some("") => None,
            Some(raw) if missing_tokens.contains(&raw) => None,
            Some(raw) => match raw.parse::<f64>() {
                Ok(number) => Some(number).filter(|v| !v.is_nan()),
                Err(_) => {
                    return Err(TransformError::malformed_cell(
                        name,
                        row,
                        raw,
                        "value is not a number",
                    ));
                }
            },
        };
        values.push(value);
    }
    Ok(values)
}

/// Reads a column as text; null and empty text read as `None`.
pub fn text_values(df: &DataFrame, name: &str) -> Result<Vec<Option<String>>> {
    let text = df.column(name)?.cast(&DataType::String)?;
    let values = text
        .str()?
        .into_iter()
        .map(|cell| cell.filter(|s| !s.is_empty()).map(str::to_string))
        .collect();
    Ok(values)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn frame() -> DataFrame {
        DataFrame::new(vec![
            Series::new("ABeta".into(), vec![Some(1.0), None, Some(f64::NAN)]).into_column(),
            Series::new("CSTDP43".into(), vec![Some("0.5"), Some("Borderline"), None])
                .into_column(),
            Series::new("NPDx1".into(), vec![Some("Alzheimer's disease"), Some(""), None])
                .into_column(),
        ])
        .unwrap()
    }

    #[test]
    fn test_has_and_missing_columns() {
        let df = frame();
        assert!(has_column(&df, "ABeta"));
        assert!(!has_column(&df, "abeta"));
        assert_eq!(
            missing_columns(&df, &["ABeta", "BraakMrg", "CERAD"]),
            vec!["BraakMrg", "CERAD"]
        );
    }

    #[test]
    fn test_numeric_values() {
        let df = frame();
        assert_eq!(numeric_values(&df, "ABeta").unwrap(), vec![Some(1.0), None, None]);
        assert_eq!(numeric_values(&df, "CSTDP43").unwrap(), vec![Some(0.5), None, None]);
    }

    #[test]
    fn test_measured_values() {
        let cerad = DataFrame::new(vec![
            Series::new("CERAD".into(), vec![Some("3"), Some(""), None, Some(" 1.5 ")])
                .into_column(),
        ])
        .unwrap();
        assert_eq!(
            measured_values(&cerad, "CERAD", &[]).unwrap(),
            vec![Some(3.0), None, None, Some(1.5)]
        );
        let df = frame();
        assert_eq!(
            measured_values(&df, "ABeta", &[]).unwrap(),
            vec![Some(1.0), None, None]
        );
    }

    #[test]
    fn test_measured_values_missing_tokens() {
        let df = DataFrame::new(vec![
            Series::new("Braak03".into(), vec![Some("2"), Some("Unknown")]).into_column(),
        ])
        .unwrap();
        assert_eq!(
            measured_values(&df, "Braak03", &["Unknown"]).unwrap(),
            vec![Some(2.0), None]
        );
        assert!(measured_values(&df, "Braak03", &[]).is_err());
    }

    #[test]
    fn test_measured_values_rejects_text() {
        let df = DataFrame::new(vec![
            Series::new("ABeta".into(), vec![Some("1"), Some("A3")]).into_column(),
        ])
        .unwrap();
        let err = measured_values(&df, "ABeta", &[]).unwrap_err();
        assert!(matches!(err, TransformError::MalformedInput { ref column, ref detail }
            if column == "ABeta" && detail.contains("row 1")));
    }

    #[test]
    fn test_text_values() {
        let df = frame();
        assert_eq!(
            text_values(&df, "NPDx1").unwrap(),
            vec![Some("Alzheimer's disease".to_string()), None, None]
        );
    }
}
