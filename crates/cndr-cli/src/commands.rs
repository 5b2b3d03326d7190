use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::{Context, Result};
use comfy_table::Table;
use polars::prelude::DataFrame;
use tracing::{info, info_span, trace};

use cndr_common::{any_to_f64, any_to_string_non_empty, format_numeric, is_missing};
use cndr_ingest::{LoadOptions, read_table, write_table};
use cndr_model::columns::{ADNC_SEVERITY, DIAGNOSTIC_FLAGS, INDDID, LATE_STAGE};
use cndr_model::{MEASURES, PipelineOptions, PipelineReport, REGIONS, is_region_measure_column};
use cndr_transform::{SEMIQ_RECODING, describe_rules, run_pipeline};

use crate::cli::ProcessArgs;
use crate::logging::redact_value;
use crate::summary::apply_table_style;

/// Outcome of `cndr process`.
#[derive(Debug)]
pub struct ProcessResult {
    pub input: PathBuf,
    /// `None` on a dry run.
    pub output: Option<PathBuf>,
    pub rows: usize,
    pub report: PipelineReport,
    /// Records with each flag set, in output order. Empty if not derived.
    pub flag_counts: Vec<(&'static str, usize)>,
    pub adnc: Option<Distribution>,
    pub late: Option<Distribution>,
}

/// Counts per value of an ordinal column; missing counted apart.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Distribution {
    pub counts: BTreeMap<String, usize>,
    pub missing: usize,
}

/// `<stem>_clean.csv` beside the input.
pub fn default_output_path(input: &Path) -> PathBuf {
    let stem = input
        .file_stem()
        .and_then(|stem| stem.to_str())
        .unwrap_or("output");
    input.with_file_name(format!("{stem}_clean.csv"))
}

pub fn pipeline_options(args: &ProcessArgs) -> PipelineOptions {
    args.skip
        .iter()
        .fold(PipelineOptions::default(), |options, stage| {
            options.with_stage(*stage, false)
        })
        .with_strict_diagnosis_columns(!args.no_strict)
}

pub fn run_process(args: &ProcessArgs) -> Result<ProcessResult> {
    let span = info_span!("process", input = %args.input.display());
    let _guard = span.enter();
    let start = Instant::now();

    let load_options = LoadOptions::default().with_separator(args.separator);
    let mut df = read_table(&args.input, &load_options)
        .with_context(|| format!("load {}", args.input.display()))?;
    let region_columns = df
        .get_column_names()
        .into_iter()
        .filter(|name| is_region_measure_column(name.as_str()))
        .count();
    info!(
        rows = df.height(),
        columns = df.width(),
        region_columns,
        "Loaded input"
    );

    let options = pipeline_options(args);
    let report = run_pipeline(&mut df, &options).context("run pipeline")?;
    trace_missing_severity(&df);

    let output = if args.dry_run {
        info!("Dry run: output not written");
        None
    } else {
        let path = args
            .output
            .clone()
            .unwrap_or_else(|| default_output_path(&args.input));
        write_table(&mut df, &path, args.separator)
            .with_context(|| format!("write {}", path.display()))?;
        info!(path = %path.display(), "Wrote output");
        Some(path)
    };

    if let Some(path) = &args.report_json {
        let json = serde_json::to_string_pretty(&report).context("serialize report")?;
        fs::write(path, json).with_context(|| format!("write {}", path.display()))?;
    }

    info!(elapsed_ms = start.elapsed().as_millis(), "Finished");
    Ok(ProcessResult {
        input: args.input.clone(),
        output,
        rows: df.height(),
        report,
        flag_counts: flag_counts(&df),
        adnc: distribution(&df, ADNC_SEVERITY),
        late: distribution(&df, LATE_STAGE),
    })
}

/// Number of records with each diagnostic flag set.
pub fn flag_counts(df: &DataFrame) -> Vec<(&'static str, usize)> {
    DIAGNOSTIC_FLAGS
        .iter()
        .filter_map(|name| {
            let column = df.column(name).ok()?;
            let count = (0..column.len())
                .filter_map(|idx| column.get(idx).ok().and_then(any_to_f64))
                .filter(|value| *value == 1.0)
                .count();
            Some((*name, count))
        })
        .collect()
}

/// Value counts of an ordinal column, or `None` when it is absent.
pub fn distribution(df: &DataFrame, name: &str) -> Option<Distribution> {
    let column = df.column(name).ok()?;
    let mut result = Distribution::default();
    for idx in 0..column.len() {
        match column.get(idx).ok().and_then(any_to_f64) {
            Some(value) => *result.counts.entry(format_numeric(value)).or_default() += 1,
            None => result.missing += 1,
        }
    }
    Some(result)
}

fn trace_missing_severity(df: &DataFrame) {
    let (Ok(ids), Ok(severity)) = (df.column(INDDID), df.column(ADNC_SEVERITY)) else {
        return;
    };
    for idx in 0..df.height() {
        let missing = severity.get(idx).map_or(true, |value| is_missing(&value));
        if !missing {
            continue;
        }
        if let Some(id) = ids.get(idx).ok().and_then(any_to_string_non_empty) {
            trace!(inddid = redact_value(&id), "ADNC_severity missing");
        }
    }
}

pub fn run_columns() {
    let mut table = Table::new();
    table.set_header(vec!["Region", "Columns"]);
    apply_table_style(&mut table);
    for region in REGIONS {
        let columns: Vec<String> = MEASURES
            .iter()
            .map(|measure| format!("{region}{measure}"))
            .collect();
        table.add_row(vec![region.to_string(), columns.join(", ")]);
    }
    println!("{table}");
    println!(
        "{} regions × {} measures = {} columns",
        REGIONS.len(),
        MEASURES.len(),
        REGIONS.len() * MEASURES.len()
    );
}

pub fn run_rules() {
    let mut table = Table::new();
    table.set_header(vec!["Value", "Recoded"]);
    apply_table_style(&mut table);
    for (token, score) in SEMIQ_RECODING {
        let recoded = score.map_or_else(|| "missing".to_string(), format_numeric);
        table.add_row(vec![token.to_string(), recoded]);
    }
    println!("{table}");
    println!();
    print!("{}", describe_rules());
}
