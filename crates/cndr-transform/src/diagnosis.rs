//! Diagnostic flags and severity scales derived from the NPDx slots.
//!
//! The eight flags are always written (as `Int32` 0/1) once the four slot
//! columns exist. `ADNC_severity` and `LATE_stage` are written only when
//! their source columns are all present in the table.

use cndr_model::columns::{
    ABETA, ADNC_SEVERITY, BRAAK_MERGED, CERAD, CS_TDP43, DG_TDP43, DIAGNOSTIC_FLAGS, EC_TDP43,
    LATE_STAGE, NPDX_SLOTS,
};
use cndr_model::diagnoses::{
    ALZHEIMERS_DISEASE, LATE_NC, NON_AD_TAUOPATHY_OR_FTLD, PRIMARY_NON_AD_TAUOPATHY,
};
use polars::prelude::*;

use crate::error::{Result, TransformError};
use crate::frame::{measured_values, missing_columns, numeric_values, text_values};
use crate::rules::{AdncInputs, LateInputs, adnc_severity, late_stage, mtl_average};

/// Columns the ADNC severity table reads.
pub const ADNC_INPUTS: [&str; 3] = [ABETA, BRAAK_MERGED, CERAD];

/// Columns averaged for LATE staging.
pub const LATE_INPUTS: [&str; 3] = [CS_TDP43, DG_TDP43, EC_TDP43];

/// One record's four diagnosis slots; empty slots are `None`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DiagnosisSlots(pub [Option<String>; 4]);

impl DiagnosisSlots {
    pub fn from_labels(labels: [Option<&str>; 4]) -> Self {
        Self(labels.map(|label| label.map(str::to_string)))
    }

    pub fn primary(&self) -> Option<&str> {
        self.0[0].as_deref()
    }

    fn any_in(&self, labels: &[&str]) -> bool {
        self.0
            .iter()
            .flatten()
            .any(|slot| labels.contains(&slot.as_str()))
    }

    pub fn flags(&self) -> DiagnosticFlags {
        DiagnosticFlags {
            any_ad: self.any_in(&[ALZHEIMERS_DISEASE]),
            first_nadt: self
                .primary()
                .is_some_and(|label| PRIMARY_NON_AD_TAUOPATHY.contains(&label)),
            any_nadt_ftld: self.any_in(&NON_AD_TAUOPATHY_OR_FTLD),
            any_late: self.any_in(&[LATE_NC]),
        }
    }
}

/// Presence flags of one record; the composite flags derive from these.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DiagnosticFlags {
    pub any_ad: bool,
    /// Primary slot holds a non-AD tauopathy. Not written to the table.
    pub first_nadt: bool,
    pub any_nadt_ftld: bool,
    pub any_late: bool,
}

impl DiagnosticFlags {
    /// AD present and the primary slot is not a competing tauopathy.
    pub fn robin_eligible(&self) -> bool {
        self.any_ad && !self.first_nadt
    }

    pub fn clean_ad(&self) -> bool {
        self.any_ad && !self.any_nadt_ftld
    }

    pub fn clean_ad_cont(&self) -> bool {
        !self.any_nadt_ftld
    }

    pub fn clean_late_ad(&self) -> bool {
        self.clean_ad() && self.any_late
    }

    pub fn clean_late_ad_cont(&self) -> bool {
        self.clean_ad_cont() && self.any_late
    }

    /// The eight emitted flags, in `DIAGNOSTIC_FLAGS` order.
    pub fn emitted(&self) -> [bool; 8] {
        [
            self.any_ad,
            self.any_nadt_ftld,
            self.any_late,
            self.robin_eligible(),
            self.clean_ad(),
            self.clean_ad_cont(),
            self.clean_late_ad(),
            self.clean_late_ad_cont(),
        ]
    }
}

/// What [`add_diagnostic_categories`] wrote.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DiagnosticSummary {
    pub columns: Vec<String>,
    pub adnc_written: bool,
    pub late_written: bool,
}

/// Adds the diagnostic flags and, where possible, the severity scales.
///
/// Fails with [`TransformError::MissingColumn`] naming the first absent
/// NPDx slot. Existing columns of the same names are overwritten.
pub fn add_diagnostic_categories(df: &mut DataFrame) -> Result<DiagnosticSummary> {
    if let Some(column) = missing_columns(df, &NPDX_SLOTS).first() {
        return Err(TransformError::missing_column(column));
    }

    let slots = read_slots(df)?;
    let flags: Vec<DiagnosticFlags> = slots.iter().map(DiagnosisSlots::flags).collect();
    let mut summary = DiagnosticSummary::default();

    let emitted: Vec<[bool; 8]> = flags.iter().map(DiagnosticFlags::emitted).collect();

    if let Some(values) = adnc_column(df)? {
        df.with_column(Series::new(ADNC_SEVERITY.into(), values).into_column())?;
        summary.columns.push(ADNC_SEVERITY.to_string());
        summary.adnc_written = true;
    }

    let missing_late = missing_columns(df, &LATE_INPUTS);
    if missing_late.is_empty() {
        let cs = numeric_values(df, CS_TDP43)?;
        let dg = numeric_values(df, DG_TDP43)?;
        let ec = numeric_values(df, EC_TDP43)?;
        let values: Vec<Option<f64>> = flags
            .iter()
            .enumerate()
            .map(|(row, flag)| {
                late_stage(&LateInputs {
                    late: flag.any_late,
                    mtl_average: mtl_average(cs[row], dg[row], ec[row]),
                })
            })
            .collect();
        df.with_column(Series::new(LATE_STAGE.into(), values).into_column())?;
        summary.columns.push(LATE_STAGE.to_string());
        summary.late_written = true;
    } else {
        tracing::debug!(missing = ?missing_late, "{LATE_STAGE} not derived");
    }

    for (idx, name) in DIAGNOSTIC_FLAGS.iter().enumerate() {
        let values: Vec<i32> = emitted.iter().map(|row| i32::from(row[idx])).collect();
        df.with_column(Series::new((*name).into(), values).into_column())?;
        summary.columns.push((*name).to_string());
    }

    tracing::debug!(
        rows = df.height(),
        adnc = summary.adnc_written,
        late = summary.late_written,
        "Derived diagnostic categories"
    );
    Ok(summary)
}

fn read_slots(df: &DataFrame) -> Result<Vec<DiagnosisSlots>> {
    let mut columns = Vec::with_capacity(NPDX_SLOTS.len());
    for name in NPDX_SLOTS {
        columns.push(text_values(df, name)?);
    }
    let slots = (0..df.height())
        .map(|row| {
            DiagnosisSlots([
                columns[0][row].clone(),
                columns[1][row].clone(),
                columns[2][row].clone(),
                columns[3][row].clone(),
            ])
        })
        .collect();
    Ok(slots)
}

fn adnc_column(df: &DataFrame) -> Result<Option<Vec<Option<f64>>>> {
    let missing = missing_columns(df, &ADNC_INPUTS);
    if !missing.is_empty() {
        if missing.len() < ADNC_INPUTS.len() {
            tracing::warn!(missing = ?missing, "{ADNC_SEVERITY} not derived");
        } else {
            tracing::debug!("{ADNC_SEVERITY} not derived: no inputs present");
        }
        return Ok(None);
    }

    let amyloid = measured_values(df, ABETA, &[])?;
    let braak = measured_values(df, BRAAK_MERGED, &[])?;
    let plaques = measured_values(df, CERAD, &[])?;
    let values = (0..df.height())
        .map(|row| {
            adnc_severity(&AdncInputs {
                amyloid: amyloid[row],
                braak: braak[row],
                plaques: plaques[row],
            })
        })
        .collect();
    Ok(Some(values))
}

#[cfg(test)]
mod tests {
    use super::*;
    use cndr_model::columns::{
        IS_ANY_DIAG_AD, IS_ANY_DIAG_NADT_FTLD, IS_CLEAN_AD, IS_CLEAN_AD_CONT, IS_ROBIN_ELIGIBLE,
    };

    fn slots_frame(rows: &[[Option<&str>; 4]]) -> DataFrame {
        let columns = NPDX_SLOTS
            .iter()
            .enumerate()
            .map(|(idx, name)| {
                let values: Vec<Option<&str>> = rows.iter().map(|row| row[idx]).collect();
                Series::new((*name).into(), values).into_column()
            })
            .collect();
        DataFrame::new(columns).unwrap()
    }

    fn flag(df: &DataFrame, name: &str, row: usize) -> i32 {
        df.column(name).unwrap().i32().unwrap().get(row).unwrap()
    }

    #[test]
    fn test_primary_ad_is_robin_eligible() {
        let slots = DiagnosisSlots::from_labels([Some(ALZHEIMERS_DISEASE), None, None, None]);
        let flags = slots.flags();
        assert!(flags.any_ad);
        assert!(!flags.first_nadt);
        assert!(flags.robin_eligible());

        let mut df = slots_frame(&[[Some(ALZHEIMERS_DISEASE), None, None, None]]);
        add_diagnostic_categories(&mut df).unwrap();
        assert_eq!(flag(&df, IS_ANY_DIAG_AD, 0), 1);
        assert_eq!(flag(&df, IS_ROBIN_ELIGIBLE, 0), 1);
        assert_eq!(flag(&df, IS_CLEAN_AD, 0), 1);
    }

    #[test]
    fn test_competing_tauopathy_blocks_clean_ad() {
        let mut df = slots_frame(&[[
            Some(ALZHEIMERS_DISEASE),
            Some("Corticobasal degeneration"),
            None,
            None,
        ]]);
        add_diagnostic_categories(&mut df).unwrap();
        assert_eq!(flag(&df, IS_ANY_DIAG_AD, 0), 1);
        assert_eq!(flag(&df, IS_ANY_DIAG_NADT_FTLD, 0), 1);
        assert_eq!(flag(&df, IS_CLEAN_AD, 0), 0);
        assert_eq!(flag(&df, IS_CLEAN_AD_CONT, 0), 0);
        // Only the primary slot counts for eligibility.
        assert_eq!(flag(&df, IS_ROBIN_ELIGIBLE, 0), 1);
    }

    #[test]
    fn test_primary_tauopathy_blocks_robin() {
        let flags = DiagnosisSlots::from_labels([
            Some("Progressive supranuclear palsy"),
            Some(ALZHEIMERS_DISEASE),
            None,
            None,
        ])
        .flags();
        assert!(flags.first_nadt);
        assert!(!flags.robin_eligible());
    }

    #[test]
    fn test_late_flags() {
        let flags =
            DiagnosisSlots::from_labels([Some(ALZHEIMERS_DISEASE), Some(LATE_NC), None, None])
                .flags();
        assert!(flags.clean_late_ad());
        assert!(flags.clean_late_ad_cont());

        let flags = DiagnosisSlots::from_labels([Some(LATE_NC), None, None, None]).flags();
        assert!(!flags.clean_late_ad());
        assert!(flags.clean_late_ad_cont());
    }

    #[test]
    fn test_labels_match_exactly() {
        let flags =
            DiagnosisSlots::from_labels([Some("alzheimer's disease"), None, None, None]).flags();
        assert!(!flags.any_ad);
    }

    #[test]
    fn test_all_flags_written_as_int32() {
        let mut df = slots_frame(&[[None, None, None, None], [Some("Other"), None, None, None]]);
        let summary = add_diagnostic_categories(&mut df).unwrap();
        for name in DIAGNOSTIC_FLAGS {
            assert_eq!(df.column(name).unwrap().dtype(), &DataType::Int32, "{name}");
        }
        assert_eq!(flag(&df, IS_CLEAN_AD_CONT, 0), 1);
        assert_eq!(flag(&df, IS_CLEAN_AD_CONT, 1), 0);
        assert!(!summary.adnc_written);
        assert!(!summary.late_written);
        assert!(df.column(ADNC_SEVERITY).is_err());
        assert!(df.column(LATE_STAGE).is_err());
    }

    #[test]
    fn test_missing_slot_fails() {
        let mut df = DataFrame::new(vec![
            Series::new("NPDx1".into(), vec![Some(ALZHEIMERS_DISEASE)]).into_column(),
            Series::new("NPDx2".into(), vec![None::<&str>]).into_column(),
        ])
        .unwrap();
        let err = add_diagnostic_categories(&mut df).unwrap_err();
        assert!(matches!(err, TransformError::MissingColumn { ref column } if column == "NPDx3"));
    }

    #[test]
    fn test_severity_scales() {
        let mut df = slots_frame(&[
            [Some(ALZHEIMERS_DISEASE), Some(LATE_NC), None, None],
            [Some(ALZHEIMERS_DISEASE), None, None, None],
        ]);
        let extra = vec![
            Series::new(ABETA.into(), vec![Some(2.6), None]).into_column(),
            Series::new(BRAAK_MERGED.into(), vec![Some(2.6), Some(1.0)]).into_column(),
            Series::new(CERAD.into(), vec![Some(2.0), Some(0.0)]).into_column(),
            Series::new(CS_TDP43.into(), vec![Some(1.0), Some(0.0)]).into_column(),
            Series::new(DG_TDP43.into(), vec![Some(0.0), Some(0.0)]).into_column(),
            Series::new(EC_TDP43.into(), vec![Some(0.5), Some(0.0)]).into_column(),
        ];
        for column in extra {
            df.with_column(column).unwrap();
        }

        let summary = add_diagnostic_categories(&mut df).unwrap();
        assert!(summary.adnc_written);
        assert!(summary.late_written);

        let adnc = df.column(ADNC_SEVERITY).unwrap().f64().unwrap();
        assert_eq!(adnc.get(0), Some(3.0));
        assert_eq!(adnc.get(1), None);
        let late = df.column(LATE_STAGE).unwrap().f64().unwrap();
        assert_eq!(late.get(0), Some(2.0));
        assert_eq!(late.get(1), Some(0.0));
    }

    #[test]
    fn test_partial_adnc_inputs_skip_column() {
        let mut df = slots_frame(&[[None, None, None, None]]);
        df.with_column(Series::new(ABETA.into(), vec![Some(1.0)]).into_column())
            .unwrap();
        let summary = add_diagnostic_categories(&mut df).unwrap();
        assert!(!summary.adnc_written);
        assert!(df.column(ADNC_SEVERITY).is_err());
    }

    #[test]
    fn test_unreadable_adnc_input_is_malformed() {
        let mut df = slots_frame(&[[Some(ALZHEIMERS_DISEASE), None, None, None]]);
        let extra = vec![
            Series::new(ABETA.into(), vec![Some("A3")]).into_column(),
            Series::new(BRAAK_MERGED.into(), vec![Some(3.0)]).into_column(),
            Series::new(CERAD.into(), vec![Some(3.0)]).into_column(),
        ];
        for column in extra {
            df.with_column(column).unwrap();
        }

        let err = add_diagnostic_categories(&mut df).unwrap_err();
        assert!(matches!(err, TransformError::MalformedInput { ref column, .. } if column == ABETA));
        assert!(df.column(ADNC_SEVERITY).is_err());
    }

    #[test]
    fn test_numeric_text_adnc_inputs_are_read() {
        let mut df = slots_frame(&[[Some(ALZHEIMERS_DISEASE), None, None, None]]);
        let extra = vec![
            Series::new(ABETA.into(), vec![Some("3")]).into_column(),
            Series::new(BRAAK_MERGED.into(), vec![Some(3.0)]).into_column(),
            Series::new(CERAD.into(), vec![Some("3")]).into_column(),
        ];
        for column in extra {
            df.with_column(column).unwrap();
        }

        add_diagnostic_categories(&mut df).unwrap();
        let adnc = df.column(ADNC_SEVERITY).unwrap().f64().unwrap();
        assert_eq!(adnc.get(0), Some(3.0));
    }
}
