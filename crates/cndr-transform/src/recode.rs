//! Semi-quantitative recoding of region × measure columns.
//!
//! Every `<Region><Measure>` column present in the table is rewritten with
//! [`SEMIQ_RECODING`]. Tokens are matched exactly (no trimming, no case
//! folding). Values outside the table pass through unchanged; numeric text
//! outside the table (`"1.5"`) keeps its value and is stored as that number.
//!
//! A column whose cells all end up numeric (or missing) becomes `Float64`.
//! A column that still holds pass-through text stays a text column; its
//! recognised tokens are rewritten to canonical numeric text (`"0.5"`) and
//! its NaN-mapped tokens to null, so a second pass leaves it unchanged.

use cndr_common::format_numeric;
use cndr_model::region_measure_columns;
use polars::prelude::*;

use crate::error::{Result, TransformError};

/// Token → score. `None` marks tokens that mean "not assessed".
pub const SEMIQ_RECODING: [(&str, Option<f64>); 9] = [
    ("Rare", Some(0.5)),
    ("0", Some(0.0)),
    ("Presumed 0", Some(0.0)),
    ("1+", Some(1.0)),
    ("2+", Some(2.0)),
    ("3+", Some(3.0)),
    ("Not Avail", None),
    ("Not Done", None),
    ("Not Available", None),
];

/// Looks up a token in [`SEMIQ_RECODING`].
///
/// The outer `Option` is "recognised?", the inner one the score.
pub fn recode_token(token: &str) -> Option<Option<f64>> {
    SEMIQ_RECODING
        .iter()
        .find(|(key, _)| *key == token)
        .map(|(_, score)| *score)
}

/// What the recoder did to one table.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecodeSummary {
    /// Region × measure columns found in the table.
    pub columns: Vec<String>,
    /// Columns that kept out-of-vocabulary text.
    pub text_columns: Vec<String>,
    /// Cells rewritten from a recognised token.
    pub cells_changed: usize,
}

#[derive(Debug, Clone, PartialEq)]
enum Cell {
    Missing,
    Number(f64),
    Text(String),
}

/// Recodes every region × measure column present in `df`, in place.
///
/// Absent columns are skipped. A column of a type that is neither text nor
/// numeric fails with [`TransformError::MalformedInput`].
pub fn recode_semiq_scores(df: &mut DataFrame) -> Result<RecodeSummary> {
    let mut summary = RecodeSummary::default();
    let present: Vec<&str> = region_measure_columns()
        .iter()
        .map(String::as_str)
        .filter(|name| df.get_column_index(name).is_some())
        .collect();

    for name in present {
        let (column, changed, has_text) = recode_column(df.column(name)?, name)?;
        df.with_column(column)?;
        tracing::debug!(column = name, cells_changed = changed, "Recoded column");
        summary.columns.push(name.to_string());
        if has_text {
            summary.text_columns.push(name.to_string());
        }
        summary.cells_changed += changed;
    }

    if !summary.text_columns.is_empty() {
        tracing::warn!(
            columns = ?summary.text_columns,
            "Region columns kept unrecognised values; they read as missing in numeric rules"
        );
    }
    Ok(summary)
}

fn recode_column(column: &Column, name: &str) -> Result<(Column, usize, bool)> {
    let dtype = column.dtype();
    if matches!(dtype, DataType::Null) || dtype.is_float() || dtype.is_integer() {
        let numeric = column.cast(&DataType::Float64)?;
        let values: Vec<Option<f64>> = numeric
            .f64()?
            .into_iter()
            .map(|value| value.filter(|v| !v.is_nan()))
            .collect();
        return Ok((Series::new(name.into(), values).into_column(), 0, false));
    }
    if !matches!(dtype, DataType::String) {
        return Err(TransformError::malformed_dtype(name, dtype));
    }

    let mut changed = 0usize;
    let cells: Vec<Cell> = column
        .str()?
        .into_iter()
        .map(|value| match value {
            None | Some("") => Cell::Missing,
            Some(token) => match recode_token(token) {
                Some(score) => {
                    changed += 1;
                    score.map_or(Cell::Missing, Cell::Number)
                }
                None => match token.parse::<f64>() {
                    Ok(number) if !number.is_nan() => Cell::Number(number),
                    _ => Cell::Text(token.to_string()),
                },
            },
        })
        .collect();

    let has_text = cells.iter().any(|cell| matches!(cell, Cell::Text(_)));
    let column = if has_text {
        let values: Vec<Option<String>> = cells
            .into_iter()
            .map(|cell| match cell {
                Cell::Missing => None,
                Cell::Number(number) => Some(format_numeric(number)),
                Cell::Text(text) => Some(text),
            })
            .collect();
        Series::new(name.into(), values).into_column()
    } else {
        let values: Vec<Option<f64>> = cells
            .into_iter()
            .map(|cell| match cell {
                Cell::Number(number) => Some(number),
                Cell::Missing | Cell::Text(_) => None,
            })
            .collect();
        Series::new(name.into(), values).into_column()
    };
    Ok((column, changed, has_text))
}
