//! Ordered threshold rule tables for the two severity scales.
//!
//! Rules are applied in table order and every matching rule overwrites the
//! running value, so a later (stronger) rule wins over an earlier one. A
//! predicate that reads a missing input does not match.

use std::fmt::Write as _;

/// One row of a rule table.
#[derive(Debug, Clone, Copy)]
pub struct ThresholdRule<I> {
    /// Stable identifier, e.g. `ADNC-3`.
    pub id: &'static str,
    /// Human-readable condition.
    pub description: &'static str,
    pub predicate: fn(&I) -> bool,
    /// Value assigned when the predicate matches.
    pub outcome: f64,
}

impl<I> ThresholdRule<I> {
    pub fn matches(&self, inputs: &I) -> bool {
        (self.predicate)(inputs)
    }
}

/// Applies `rules` in order starting from `start`.
pub fn apply_rules<I>(start: Option<f64>, rules: &[ThresholdRule<I>], inputs: &I) -> Option<f64> {
    rules.iter().fold(start, |value, rule| {
        if rule.matches(inputs) {
            Some(rule.outcome)
        } else {
            value
        }
    })
}

fn gt(value: Option<f64>, threshold: f64) -> bool {
    value.is_some_and(|v| v > threshold)
}

// ============================================================================
// ADNC severity
// ============================================================================

/// Per-record inputs of the ADNC severity table.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct AdncInputs {
    /// `ABeta`
    pub amyloid: Option<f64>,
    /// `BraakMrg`
    pub braak: Option<f64>,
    /// `CERAD`
    pub plaques: Option<f64>,
}

impl AdncInputs {
    pub fn is_complete(&self) -> bool {
        self.amyloid.is_some() && self.braak.is_some() && self.plaques.is_some()
    }
}

fn adnc_low(i: &AdncInputs) -> bool {
    gt(i.amyloid, 0.5)
}

fn adnc_intermediate_by_amyloid(i: &AdncInputs) -> bool {
    gt(i.braak, 1.5) && gt(i.amyloid, 1.5)
}

fn adnc_intermediate_by_plaques(i: &AdncInputs) -> bool {
    gt(i.braak, 1.5) && gt(i.amyloid, 0.5) && gt(i.plaques, 1.5)
}

fn adnc_high(i: &AdncInputs) -> bool {
    gt(i.braak, 2.5) && gt(i.amyloid, 2.5) && gt(i.plaques, 1.5)
}

/// ADNC severity rules, weakest first.
pub static ADNC_RULES: [ThresholdRule<AdncInputs>; 4] = [
    ThresholdRule {
        id: "ADNC-1",
        description: "ABeta > 0.5",
        predicate: adnc_low,
        outcome: 1.0,
    },
    ThresholdRule {
        id: "ADNC-2",
        description: "BraakMrg > 1.5 and ABeta > 1.5",
        predicate: adnc_intermediate_by_amyloid,
        outcome: 2.0,
    },
    ThresholdRule {
        id: "ADNC-3",
        description: "BraakMrg > 1.5 and ABeta > 0.5 and CERAD > 1.5",
        predicate: adnc_intermediate_by_plaques,
        outcome: 2.0,
    },
    ThresholdRule {
        id: "ADNC-4",
        description: "BraakMrg > 2.5 and ABeta > 2.5 and CERAD > 1.5",
        predicate: adnc_high,
        outcome: 3.0,
    },
];

/// Computes one record's ADNC severity.
///
/// Starts at 0, or at missing when any input is missing; matching rules
/// then override the start value.
pub fn adnc_severity(inputs: &AdncInputs) -> Option<f64> {
    let start = inputs.is_complete().then_some(0.0);
    apply_rules(start, &ADNC_RULES, inputs)
}

// ============================================================================
// LATE stage
// ============================================================================

/// Per-record inputs of the LATE staging table.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct LateInputs {
    /// Any diagnosis slot holds the LATE-NC label.
    pub late: bool,
    /// Mean of `CSTDP43`, `DGTDP43` and `ECTDP43`; missing if any is.
    pub mtl_average: Option<f64>,
}

fn late_diagnosed(i: &LateInputs) -> bool {
    i.late
}

fn late_medial_temporal(i: &LateInputs) -> bool {
    i.late && gt(i.mtl_average, 0.0)
}

/// LATE staging rules, weakest first.
pub static LATE_RULES: [ThresholdRule<LateInputs>; 2] = [
    ThresholdRule {
        id: "LATE-1",
        description: "LATE-NC diagnosed",
        predicate: late_diagnosed,
        outcome: 1.0,
    },
    ThresholdRule {
        id: "LATE-2",
        description: "LATE-NC diagnosed and mean(CSTDP43, DGTDP43, ECTDP43) > 0",
        predicate: late_medial_temporal,
        outcome: 2.0,
    },
];

/// Mean of the three medial temporal TDP-43 scores.
pub fn mtl_average(cs: Option<f64>, dg: Option<f64>, ec: Option<f64>) -> Option<f64> {
    Some((cs? + dg? + ec?) / 3.0)
}

/// Computes one record's LATE stage. Always starts at 0.
pub fn late_stage(inputs: &LateInputs) -> Option<f64> {
    apply_rules(Some(0.0), &LATE_RULES, inputs)
}

/// Renders both tables as plain text, one rule per line.
pub fn describe_rules() -> String {
    let mut out = String::new();
    let _ = writeln!(out, "ADNC_severity (start 0, missing if any input missing)");
    for rule in &ADNC_RULES {
        let _ = writeln!(out, "  {} -> {}: {}", rule.id, rule.outcome, rule.description);
    }
    let _ = writeln!(out, "LATE_stage (start 0)");
    for rule in &LATE_RULES {
        let _ = writeln!(out, "  {} -> {}: {}", rule.id, rule.outcome, rule.description);
    }
    out
}
