//! Fixed vocabularies of the CNDR intake export.
//!
//! Column names and diagnosis labels are matched exactly as the export
//! spells them; nothing here is case-folded or trimmed.

use std::sync::LazyLock;

/// Anatomical region codes used as column-name prefixes.
pub const REGIONS: [&str; 24] = [
    "Amyg",
    "DG",
    "CS",
    "EC",
    "MF",
    "Ang",
    "SMT",
    "Cing",
    "OC",
    "Neocortical",
    "CP",
    "GP",
    "TS",
    "Subcortical",
    "MB",
    "SN",
    "Pons",
    "LC",
    "Med",
    "CB",
    "SC",
    "Brainstem",
    "MC",
    "OFC",
];

/// Pathology measure codes used as column-name suffixes.
pub const MEASURES: [&str; 10] = [
    "Tau",
    "ThioPlaques",
    "AntibodyPlaques",
    "aSyn",
    "Ubiquitin",
    "Gliosis",
    "NeuronLoss",
    "TDP43",
    "Other",
    "Update",
];

static REGION_MEASURE_COLUMNS: LazyLock<Vec<String>> = LazyLock::new(|| {
    REGIONS
        .iter()
        .flat_map(|region| MEASURES.iter().map(move |measure| format!("{region}{measure}")))
        .collect()
});

/// All `<Region><Measure>` column names, region-major.
///
/// Built once on first access.
pub fn region_measure_columns() -> &'static [String] {
    REGION_MEASURE_COLUMNS.as_slice()
}

/// Returns true if `name` is one of the region × measure columns.
pub fn is_region_measure_column(name: &str) -> bool {
    REGION_MEASURE_COLUMNS.iter().any(|column| column == name)
}

/// Column names read and written by the pipeline.
pub mod columns {
    /// Subject identifier, always loaded as text.
    pub const INDDID: &str = "INDDID";
    /// Imaging session date, loaded as a calendar date.
    pub const FLYWHEEL_SESSION_DATE: &str = "FlywheelSessionDate";
    /// Autopsy date, loaded as a calendar date.
    pub const AUTOPSY_DATE: &str = "AutopsyDate";

    /// Braak stage on the 0-6 scale.
    pub const BRAAK06: &str = "Braak06";
    /// Braak stage on the 0-3 scale.
    pub const BRAAK03: &str = "Braak03";
    /// Reconciled Braak stage on the 0-3 scale.
    pub const BRAAK_MERGED: &str = "BraakMrg";

    /// Amyloid (Thal-derived) score.
    pub const ABETA: &str = "ABeta";
    /// Neuritic plaque density score.
    pub const CERAD: &str = "CERAD";

    /// Regional TDP-43 scores averaged for LATE staging.
    pub const CS_TDP43: &str = "CSTDP43";
    pub const DG_TDP43: &str = "DGTDP43";
    pub const EC_TDP43: &str = "ECTDP43";

    /// The four diagnosis slots, primary first.
    pub const NPDX_SLOTS: [&str; 4] = ["NPDx1", "NPDx2", "NPDx3", "NPDx4"];

    pub const ADNC_SEVERITY: &str = "ADNC_severity";
    pub const LATE_STAGE: &str = "LATE_stage";

    pub const IS_ANY_DIAG_AD: &str = "is_any_diag_ad";
    pub const IS_ANY_DIAG_NADT_FTLD: &str = "is_any_diag_nadt_ftld";
    pub const IS_ANY_DIAG_LATE: &str = "is_any_diag_late";
    pub const IS_ROBIN_ELIGIBLE: &str = "is_robin_eligible";
    pub const IS_CLEAN_AD: &str = "is_clean_ad";
    pub const IS_CLEAN_AD_CONT: &str = "is_clean_ad_cont";
    pub const IS_CLEAN_LATE_AD: &str = "is_clean_late_ad";
    pub const IS_CLEAN_LATE_AD_CONT: &str = "is_clean_late_ad_cont";

    /// Flag columns in output order.
    pub const DIAGNOSTIC_FLAGS: [&str; 8] = [
        IS_ANY_DIAG_AD,
        IS_ANY_DIAG_NADT_FTLD,
        IS_ANY_DIAG_LATE,
        IS_ROBIN_ELIGIBLE,
        IS_CLEAN_AD,
        IS_CLEAN_AD_CONT,
        IS_CLEAN_LATE_AD,
        IS_CLEAN_LATE_AD_CONT,
    ];
}

/// Diagnosis labels as they appear in the NPDx slots.
pub mod diagnoses {
    pub const ALZHEIMERS_DISEASE: &str = "Alzheimer's disease";
    pub const LATE_NC: &str =
        "Limbic-predominant Age-related TDP-43 Encephalopathy (Also known as LATE)";

    /// Non-AD tauopathies that disqualify a record when recorded as the
    /// primary diagnosis (DeFlores et al. 2020 selection).
    pub const PRIMARY_NON_AD_TAUOPATHY: [&str; 6] = [
        "Argyrophilic grain disease",
        "Corticobasal degeneration",
        "Globular glial tauopathy",
        "Progressive supranuclear palsy",
        "Tauopathy unclassifiable",
        "Other",
    ];

    /// Non-AD tauopathies and FTLD-spectrum diagnoses checked in any slot.
    pub const NON_AD_TAUOPATHY_OR_FTLD: [&str; 13] = [
        "Amyotrophic lateral sclerosis",
        "Amyotrophic lateral sclerosis - Other",
        "Argyrophilic grain disease",
        "Chronic Traumatic Encephalopathy",
        "Corticobasal degeneration",
        "Frontotemporal dementia with parkinsonism linked to chromosome 17",
        "Frontotemporal lobar degeneration with TDP inclusions (Also known as FTLD-TDP)",
        "Globular glial tauopathy",
        "Multiple system atrophy",
        "Pick's disease",
        "Progressive supranuclear palsy",
        "Tauopathy unclassifiable",
        "Other",
    ];
}
