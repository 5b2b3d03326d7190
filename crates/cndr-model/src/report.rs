//! Outcome of a pipeline run.

use serde::{Deserialize, Serialize};

use crate::options::StageId;

/// What happened to a stage during a run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum StageStatus {
    /// The stage ran and wrote its columns.
    Applied,
    /// The stage was enabled but its inputs were not present.
    Skipped { reason: String },
    /// The stage was switched off in the options.
    Disabled,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StageReport {
    pub stage: StageId,
    pub status: StageStatus,
    /// Columns added or overwritten by the stage.
    pub columns_written: Vec<String>,
    /// Cells whose value changed (recoding) or were derived (other stages).
    pub cells_changed: usize,
}

impl StageReport {
    pub fn applied(stage: StageId, columns_written: Vec<String>, cells_changed: usize) -> Self {
        Self {
            stage,
            status: StageStatus::Applied,
            columns_written,
            cells_changed,
        }
    }

    pub fn skipped(stage: StageId, reason: impl Into<String>) -> Self {
        Self {
            stage,
            status: StageStatus::Skipped {
                reason: reason.into(),
            },
            columns_written: Vec::new(),
            cells_changed: 0,
        }
    }

    pub fn disabled(stage: StageId) -> Self {
        Self {
            stage,
            status: StageStatus::Disabled,
            columns_written: Vec::new(),
            cells_changed: 0,
        }
    }

    pub fn is_applied(&self) -> bool {
        matches!(self.status, StageStatus::Applied)
    }
}

/// Per-stage reports in execution order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PipelineReport {
    pub stages: Vec<StageReport>,
}

impl PipelineReport {
    pub fn stage(&self, stage: StageId) -> Option<&StageReport> {
        self.stages.iter().find(|report| report.stage == stage)
    }

    pub fn applied_count(&self) -> usize {
        self.stages.iter().filter(|report| report.is_applied()).count()
    }

    pub fn total_cells_changed(&self) -> usize {
        self.stages.iter().map(|report| report.cells_changed).sum()
    }

    /// All columns written across stages, in order.
    pub fn columns_written(&self) -> impl Iterator<Item = &str> {
        self.stages
            .iter()
            .flat_map(|report| report.columns_written.iter().map(String::as_str))
    }
}
