//! Ordered stage execution.
//!
//! The pipeline is a fixed sequence of stages:
//! - `recode-semiq` - semi-quantitative recoding of region × measure columns
//! - `merge-braak` - reconciliation of the two Braak scales
//! - `diagnostic-categories` - flags and severity scales
//!
//! Each stage carries metadata and decides for itself whether the table has
//! what it needs. Stages switched off in [`PipelineOptions`] are reported as
//! disabled and never looked at.

use std::collections::HashSet;

use cndr_model::columns::{BRAAK_MERGED, BRAAK03, BRAAK06, NPDX_SLOTS};
use cndr_model::{PipelineOptions, PipelineReport, StageId, StageReport};
use polars::prelude::DataFrame;

use crate::braak::merge_braak_stages;
use crate::diagnosis::add_diagnostic_categories;
use crate::error::Result;
use crate::frame::missing_columns;
use crate::recode::recode_semiq_scores;

/// Metadata about a pipeline stage.
#[derive(Debug, Clone)]
pub struct StageMetadata {
    pub id: StageId,
    pub description: &'static str,
    /// Columns the stage may write.
    pub outputs: Vec<String>,
}

/// Whether a stage can run on a given table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Activation {
    Ready,
    Skip(String),
}

/// One step of the pipeline.
pub trait PipelineStage: Send + Sync {
    fn metadata(&self) -> &StageMetadata;

    /// Table-level check run before [`apply`](Self::apply).
    fn should_apply(&self, _df: &DataFrame) -> Activation {
        Activation::Ready
    }

    fn apply(&self, df: &mut DataFrame) -> Result<StageReport>;
}

// ============================================================================
// Stages
// ============================================================================

pub struct RecodeStage {
    meta: StageMetadata,
}

impl Default for RecodeStage {
    fn default() -> Self {
        Self {
            meta: StageMetadata {
                id: StageId::RecodeSemiq,
                description: "Recode semi-quantitative region scores to numbers",
                outputs: cndr_model::region_measure_columns().to_vec(),
            },
        }
    }
}

impl PipelineStage for RecodeStage {
    fn metadata(&self) -> &StageMetadata {
        &self.meta
    }

    fn apply(&self, df: &mut DataFrame) -> Result<StageReport> {
        let summary = recode_semiq_scores(df)?;
        Ok(StageReport::applied(
            self.meta.id,
            summary.columns,
            summary.cells_changed,
        ))
    }
}

pub struct BraakMergeStage {
    meta: StageMetadata,
}

impl Default for BraakMergeStage {
    fn default() -> Self {
        Self {
            meta: StageMetadata {
                id: StageId::MergeBraak,
                description: "Reconcile Braak06 and Braak03 into BraakMrg",
                outputs: vec![BRAAK_MERGED.to_string()],
            },
        }
    }
}

impl PipelineStage for BraakMergeStage {
    fn metadata(&self) -> &StageMetadata {
        &self.meta
    }

    fn should_apply(&self, df: &DataFrame) -> Activation {
        let missing = missing_columns(df, &[BRAAK06, BRAAK03]);
        if missing.is_empty() {
            Activation::Ready
        } else {
            Activation::Skip(format!("{} not present", missing.join(", ")))
        }
    }

    fn apply(&self, df: &mut DataFrame) -> Result<StageReport> {
        let merged = merge_braak_stages(df)?;
        let columns = if merged {
            vec![BRAAK_MERGED.to_string()]
        } else {
            Vec::new()
        };
        let cells = if merged { df.height() } else { 0 };
        Ok(StageReport::applied(self.meta.id, columns, cells))
    }
}

pub struct DiagnosticStage {
    meta: StageMetadata,
    strict: bool,
}

impl DiagnosticStage {
    /// With `strict`, absent NPDx slots fail the run instead of skipping.
    pub fn new(strict: bool) -> Self {
        let mut outputs: Vec<String> = cndr_model::columns::DIAGNOSTIC_FLAGS
            .iter()
            .map(ToString::to_string)
            .collect();
        outputs.push(cndr_model::columns::ADNC_SEVERITY.to_string());
        outputs.push(cndr_model::columns::LATE_STAGE.to_string());
        Self {
            meta: StageMetadata {
                id: StageId::DiagnosticCategories,
                description: "Derive diagnostic flags, ADNC severity and LATE stage",
                outputs,
            },
            strict,
        }
    }
}

impl PipelineStage for DiagnosticStage {
    fn metadata(&self) -> &StageMetadata {
        &self.meta
    }

    fn should_apply(&self, df: &DataFrame) -> Activation {
        let missing = missing_columns(df, &NPDX_SLOTS);
        if missing.is_empty() || self.strict {
            Activation::Ready
        } else {
            Activation::Skip(format!("{} not present", missing.join(", ")))
        }
    }

    fn apply(&self, df: &mut DataFrame) -> Result<StageReport> {
        let summary = add_diagnostic_categories(df)?;
        let cells = summary.columns.len() * df.height();
        Ok(StageReport::applied(self.meta.id, summary.columns, cells))
    }
}

// ============================================================================
// Executor
// ============================================================================

/// Runs stages in insertion order.
#[derive(Default)]
pub struct StageExecutor {
    stages: Vec<Box<dyn PipelineStage>>,
    disabled: HashSet<StageId>,
}

impl StageExecutor {
    pub fn new() -> Self {
        Self::default()
    }

    /// The standard three stages, configured from `options`.
    pub fn from_options(options: &PipelineOptions) -> Self {
        let mut executor = Self::new();
        executor.add_stage(Box::new(RecodeStage::default()));
        executor.add_stage(Box::new(BraakMergeStage::default()));
        executor.add_stage(Box::new(DiagnosticStage::new(
            options.strict_diagnosis_columns,
        )));
        for stage in StageId::ALL {
            if !options.is_enabled(stage) {
                executor.disable_stage(stage);
            }
        }
        executor
    }

    pub fn add_stage(&mut self, stage: Box<dyn PipelineStage>) {
        self.stages.push(stage);
    }

    pub fn disable_stage(&mut self, id: StageId) {
        self.disabled.insert(id);
    }

    pub fn is_stage_disabled(&self, id: StageId) -> bool {
        self.disabled.contains(&id)
    }

    pub fn stage_metadata(&self) -> Vec<&StageMetadata> {
        self.stages.iter().map(|stage| stage.metadata()).collect()
    }

    /// Executes every stage; the first failing stage aborts the run.
    pub fn execute(&self, df: &mut DataFrame) -> Result<PipelineReport> {
        let mut report = PipelineReport::default();
        for stage in &self.stages {
            let meta = stage.metadata();

            if self.is_stage_disabled(meta.id) {
                tracing::debug!(stage = %meta.id, "Stage disabled");
                report.stages.push(StageReport::disabled(meta.id));
                continue;
            }

            if let Activation::Skip(reason) = stage.should_apply(df) {
                tracing::warn!(stage = %meta.id, %reason, "Stage skipped");
                report.stages.push(StageReport::skipped(meta.id, reason));
                continue;
            }

            let stage_report = stage.apply(df)?;
            tracing::info!(
                stage = %meta.id,
                columns = stage_report.columns_written.len(),
                cells_changed = stage_report.cells_changed,
                "Stage applied"
            );
            report.stages.push(stage_report);
        }
        Ok(report)
    }
}

/// Runs every stage enabled in `options` on `df`, in place.
pub fn run_pipeline(df: &mut DataFrame, options: &PipelineOptions) -> Result<PipelineReport> {
    tracing::info!(rows = df.height(), columns = df.width(), "Running pipeline");
    StageExecutor::from_options(options).execute(df)
}

/// Default cleaning: recoding followed by Braak reconciliation.
pub fn clean_dataset(df: &mut DataFrame) -> Result<PipelineReport> {
    run_pipeline(df, &PipelineOptions::cleaning_only())
}

#[cfg(test)]
mod tests {
    use super::*;
    use cndr_model::StageStatus;
    use polars::prelude::*;

    use crate::error::TransformError;

    fn braak_only() -> DataFrame {
        DataFrame::new(vec![
            Series::new("Braak06".into(), vec![Some(4i64)]).into_column(),
            Series::new("Braak03".into(), vec![None::<i64>]).into_column(),
        ])
        .unwrap()
    }

    #[test]
    fn test_stage_order() {
        let executor = StageExecutor::from_options(&PipelineOptions::default());
        let ids: Vec<StageId> = executor.stage_metadata().iter().map(|m| m.id).collect();
        assert_eq!(ids, StageId::ALL.to_vec());
    }

    #[test]
    fn test_clean_dataset_skips_diagnoses() {
        let mut df = braak_only();
        let report = clean_dataset(&mut df).unwrap();
        assert_eq!(
            report.stage(StageId::DiagnosticCategories).map(|s| &s.status),
            Some(&StageStatus::Disabled)
        );
        let merged = df.column(BRAAK_MERGED).unwrap().f64().unwrap();
        assert_eq!(merged.get(0), Some(2.0));
    }

    #[test]
    fn test_strict_diagnoses_fail_without_slots() {
        let mut df = braak_only();
        let err = run_pipeline(&mut df, &PipelineOptions::default()).unwrap_err();
        assert!(matches!(err, TransformError::MissingColumn { ref column } if column == "NPDx1"));
    }

    #[test]
    fn test_lenient_diagnoses_skip_without_slots() {
        let mut df = braak_only();
        let options = PipelineOptions::default().with_strict_diagnosis_columns(false);
        let report = run_pipeline(&mut df, &options).unwrap();
        let stage = report.stage(StageId::DiagnosticCategories).unwrap();
        assert!(matches!(stage.status, StageStatus::Skipped { .. }));
        assert_eq!(report.applied_count(), 2);
    }

    #[test]
    fn test_braak_skipped_when_source_missing() {
        let mut df = DataFrame::new(vec![
            Series::new("Braak06".into(), vec![Some(4i64)]).into_column(),
        ])
        .unwrap();
        let report = clean_dataset(&mut df).unwrap();
        let stage = report.stage(StageId::MergeBraak).unwrap();
        assert_eq!(
            stage.status,
            StageStatus::Skipped {
                reason: "Braak03 not present".to_string()
            }
        );
        assert!(df.column(BRAAK_MERGED).is_err());
    }

    #[test]
    fn test_disabled_stage_leaves_table() {
        let mut df = DataFrame::new(vec![
            Series::new("AmygTau".into(), vec!["Rare"]).into_column(),
        ])
        .unwrap();
        let options = PipelineOptions::cleaning_only().with_stage(StageId::RecodeSemiq, false);
        let report = run_pipeline(&mut df, &options).unwrap();
        assert_eq!(report.applied_count(), 0);
        assert_eq!(df.column("AmygTau").unwrap().str().unwrap().get(0), Some("Rare"));
    }
}
