//! Shared model for the CNDR intake pipeline.
//!
//! Holds the fixed vocabularies the pipeline keys on (region and measure
//! codes, diagnosis labels, column names), the options that switch stages
//! on and off, and the report produced by a pipeline run.

pub mod error;
pub mod options;
pub mod report;
pub mod vocabulary;

pub use error::{ModelError, Result};
pub use options::{PipelineOptions, StageId};
pub use report::{PipelineReport, StageReport, StageStatus};
pub use vocabulary::{
    MEASURES, REGIONS, columns, diagnoses, is_region_measure_column, region_measure_columns,
};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn report_counts_applied_stages() {
        let report = PipelineReport {
            stages: vec![
                StageReport::applied(StageId::RecodeSemiq, vec!["AmygTau".to_string()], 4),
                StageReport::skipped(StageId::MergeBraak, "Braak03 not present"),
                StageReport::disabled(StageId::DiagnosticCategories),
            ],
        };
        assert_eq!(report.applied_count(), 1);
        assert_eq!(report.total_cells_changed(), 4);
        assert!(report.stage(StageId::MergeBraak).is_some());
    }

    #[test]
    fn report_serializes() {
        let report = PipelineReport {
            stages: vec![StageReport::applied(
                StageId::MergeBraak,
                vec!["BraakMrg".to_string()],
                2,
            )],
        };
        let json = serde_json::to_string(&report).expect("serialize report");
        let round: PipelineReport = serde_json::from_str(&json).expect("deserialize report");
        assert_eq!(round, report);
    }
}
