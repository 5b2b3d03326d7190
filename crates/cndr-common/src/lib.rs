//! Shared utilities for the CNDR crates.
//!
//! Cell-level helpers for reading Polars values the same way in every
//! crate: text cells, numeric cells and the null/empty convention.

pub mod cell;

pub use cell::{
    any_to_f64, any_to_string, any_to_string_non_empty, format_numeric, is_missing, parse_f64,
};
