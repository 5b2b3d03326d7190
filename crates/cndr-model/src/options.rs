//! Configuration options for a pipeline run.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ModelError;

/// Identifies one stage of the pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum StageId {
    /// Semi-quantitative region × measure recoding.
    RecodeSemiq,
    /// Braak 0-6 / 0-3 reconciliation.
    MergeBraak,
    /// Diagnosis flags, ADNC severity and LATE stage.
    DiagnosticCategories,
}

impl StageId {
    /// All stages in execution order.
    pub const ALL: [StageId; 3] = [
        StageId::RecodeSemiq,
        StageId::MergeBraak,
        StageId::DiagnosticCategories,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::RecodeSemiq => "recode-semiq",
            Self::MergeBraak => "merge-braak",
            Self::DiagnosticCategories => "diagnostic-categories",
        }
    }
}

impl fmt::Display for StageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for StageId {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|stage| stage.as_str() == s.trim())
            .ok_or_else(|| ModelError::UnknownStage(s.to_string()))
    }
}

/// Options controlling which stages run and how strictly inputs are checked.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PipelineOptions {
    /// Recode region × measure columns to numbers.
    pub recode: bool,

    /// Derive `BraakMrg` from `Braak06` and `Braak03`.
    pub merge_braak: bool,

    /// Derive diagnosis flags and severity scales.
    pub diagnoses: bool,

    /// Treat absent NPDx slot columns as a fatal error.
    ///
    /// When false the diagnostic stage is skipped instead.
    pub strict_diagnosis_columns: bool,
}

impl Default for PipelineOptions {
    fn default() -> Self {
        Self {
            recode: true,
            merge_braak: true,
            diagnoses: true,
            strict_diagnosis_columns: true,
        }
    }
}

impl PipelineOptions {
    /// Options for the cleaning pass only (recode + Braak merge).
    pub fn cleaning_only() -> Self {
        Self {
            diagnoses: false,
            ..Self::default()
        }
    }

    /// Enable or disable a stage.
    #[must_use]
    pub fn with_stage(mut self, stage: StageId, enabled: bool) -> Self {
        match stage {
            StageId::RecodeSemiq => self.recode = enabled,
            StageId::MergeBraak => self.merge_braak = enabled,
            StageId::DiagnosticCategories => self.diagnoses = enabled,
        }
        self
    }

    #[must_use]
    pub fn with_strict_diagnosis_columns(mut self, strict: bool) -> Self {
        self.strict_diagnosis_columns = strict;
        self
    }

    pub fn is_enabled(&self, stage: StageId) -> bool {
        match stage {
            StageId::RecodeSemiq => self.recode,
            StageId::MergeBraak => self.merge_braak,
            StageId::DiagnosticCategories => self.diagnoses,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stage_ids_parse_and_print() {
        for stage in StageId::ALL {
            assert_eq!(stage.as_str().parse::<StageId>(), Ok(stage));
            assert_eq!(stage.to_string(), stage.as_str());
        }
        assert_eq!(
            "recode".parse::<StageId>(),
            Err(ModelError::UnknownStage("recode".to_string()))
        );
    }

    #[test]
    fn with_stage_toggles_one_switch() {
        let options = PipelineOptions::default().with_stage(StageId::MergeBraak, false);
        assert!(options.is_enabled(StageId::RecodeSemiq));
        assert!(!options.is_enabled(StageId::MergeBraak));
        assert!(options.is_enabled(StageId::DiagnosticCategories));
    }

    #[test]
    fn cleaning_only_disables_diagnoses() {
        let options = PipelineOptions::cleaning_only();
        assert!(options.recode && options.merge_braak);
        assert!(!options.diagnoses);
        assert!(options.strict_diagnosis_columns);
    }
}
