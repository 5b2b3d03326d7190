//! Recoding and derivation pipeline for CNDR neuropathology tables.
//!
//! Three stages run in order over a Polars `DataFrame`, in place:
//!
//! 1. [`recode_semiq_scores`] rewrites semi-quantitative region scores
//!    (`Rare`, `1+`, ...) as numbers.
//! 2. [`merge_braak_stages`] reconciles `Braak06` and `Braak03` into
//!    `BraakMrg`.
//! 3. [`add_diagnostic_categories`] derives the diagnostic flags from the
//!    NPDx slots plus `ADNC_severity` and `LATE_stage` when their inputs
//!    are present.
//!
//! [`clean_dataset`] runs the first two; [`run_pipeline`] runs whatever
//! [`PipelineOptions`](cndr_model::PipelineOptions) enables and returns a
//! report.

pub mod braak;
pub mod diagnosis;
pub mod error;
pub mod frame;
pub mod pipeline;
pub mod recode;
pub mod rules;

pub use braak::{merge_braak_stages, merge_stage};
pub use diagnosis::{
    DiagnosisSlots, DiagnosticFlags, DiagnosticSummary, add_diagnostic_categories,
};
pub use error::{Result, TransformError};
pub use pipeline::{
    Activation, PipelineStage, StageExecutor, StageMetadata, clean_dataset, run_pipeline,
};
pub use recode::{RecodeSummary, SEMIQ_RECODING, recode_semiq_scores, recode_token};
pub use rules::{
    ADNC_RULES, AdncInputs, LATE_RULES, LateInputs, ThresholdRule, adnc_severity, describe_rules,
    late_stage, mtl_average,
};
