//! Reconciliation of the two Braak staging columns.
//!
//! `Braak06` records the 0-6 stage, `Braak03` the 0-3 stage. The merged
//! stage is the mean of `ceil(Braak06 / 2)` and `Braak03` over whichever of
//! the two is present.

use cndr_model::columns::{BRAAK_MERGED, BRAAK03, BRAAK06};
use polars::prelude::*;

use crate::error::Result;
use crate::frame::{has_column, measured_values};

/// Text that means "not staged".
pub const UNKNOWN_STAGE: &str = "Unknown";

/// Merges one record's stages.
///
/// Missing inputs are ignored; both missing gives `None`.
pub fn merge_stage(coarse: Option<f64>, fine: Option<f64>) -> Option<f64> {
    let halved = coarse.map(|stage| (stage * 0.5).ceil());
    match (halved, fine) {
        (Some(a), Some(b)) => Some((a + b) / 2.0),
        (Some(a), None) => Some(a),
        (None, Some(b)) => Some(b),
        (None, None) => None,
    }
}

/// Derives `BraakMrg` when both `Braak06` and `Braak03` are present.
///
/// Returns `false` (and leaves `df` untouched) when either is absent.
pub fn merge_braak_stages(df: &mut DataFrame) -> Result<bool> {
    if !has_column(df, BRAAK06) || !has_column(df, BRAAK03) {
        tracing::debug!("Braak merge skipped: staging columns not present");
        return Ok(false);
    }

    let coarse = measured_values(df, BRAAK06, &[UNKNOWN_STAGE])?;
    let fine = measured_values(df, BRAAK03, &[UNKNOWN_STAGE])?;
    let merged: Vec<Option<f64>> = coarse
        .into_iter()
        .zip(fine)
        .map(|(coarse, fine)| merge_stage(coarse, fine))
        .collect();

    let missing = merged.iter().filter(|value| value.is_none()).count();
    df.with_column(Series::new(BRAAK_MERGED.into(), merged).into_column())?;
    tracing::debug!(missing, "Derived {BRAAK_MERGED}");
    Ok(true)
}
