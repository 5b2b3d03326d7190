//! CLI argument definitions for `cndr`.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use clap_verbosity_flag::{Verbosity, WarnLevel};
use colorchoice_clap::Color;

use cndr_model::StageId;

#[derive(Parser)]
#[command(
    name = "cndr",
    version,
    about = "Recode and derive diagnostic categories for CNDR neuropathology exports",
    long_about = "Recode semi-quantitative regional pathology scores, reconcile the two\n\
                  Braak staging columns and derive diagnostic flags, ADNC severity and\n\
                  LATE stage for a CNDR intake export."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Adjust log verbosity (-v for info, -vv for debug, -q for errors only).
    #[command(flatten)]
    pub verbosity: Verbosity<WarnLevel>,

    /// Control ANSI color output (auto, always, never).
    #[command(flatten)]
    pub color: Color,

    /// Explicit log level (overrides -v/-q flags).
    #[arg(long = "log-level", value_enum, global = true)]
    pub log_level: Option<LogLevelArg>,

    /// Log output format.
    #[arg(
        long = "log-format",
        value_enum,
        default_value = "pretty",
        global = true
    )]
    pub log_format: LogFormatArg,

    /// Write logs to a file instead of stderr.
    #[arg(long = "log-file", value_name = "PATH", global = true)]
    pub log_file: Option<PathBuf>,

    /// Allow subject identifiers in trace-level log output.
    #[arg(long = "log-data", global = true)]
    pub log_data: bool,
}

#[derive(Subcommand)]
pub enum Command {
    /// Run the pipeline over an export and write the augmented table.
    Process(ProcessArgs),

    /// List the region × measure columns the recoder looks for.
    Columns,

    /// Print the recoding table and the severity rule tables.
    Rules,
}

#[derive(Parser)]
pub struct ProcessArgs {
    /// Export to process: delimited text, or a workbook (.xlsx, .xls, .ods) read from its first sheet.
    #[arg(value_name = "INPUT")]
    pub input: PathBuf,

    /// Output path (default: <INPUT stem>_clean.csv next to the input).
    #[arg(long = "output", short = 'o', value_name = "PATH")]
    pub output: Option<PathBuf>,

    /// Run and report without writing the output table.
    #[arg(long = "dry-run")]
    pub dry_run: bool,

    /// Skip a stage (repeatable).
    #[arg(long = "skip", value_name = "STAGE", value_parser = parse_stage)]
    pub skip: Vec<StageId>,

    /// Skip the diagnostic stage instead of failing when NPDx slots are absent.
    #[arg(long = "no-strict")]
    pub no_strict: bool,

    /// Field separator of delimited input and of the output (a single character, or `tab`).
    #[arg(long = "separator", value_name = "CHAR", default_value = ",", value_parser = parse_separator)]
    pub separator: u8,

    /// Also write the run report as JSON.
    #[arg(long = "report-json", value_name = "PATH")]
    pub report_json: Option<PathBuf>,
}

/// CLI log level choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogLevelArg {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// CLI log format choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogFormatArg {
    Pretty,
    Compact,
    Json,
}

fn parse_stage(value: &str) -> Result<StageId, String> {
    value.parse::<StageId>().map_err(|e| e.to_string())
}

/// Parses a separator argument into a single byte.
pub fn parse_separator(value: &str) -> Result<u8, String> {
    match value {
        "tab" | "\\t" | "\t" => Ok(b'\t'),
        _ => match value.as_bytes() {
            [byte] if byte.is_ascii() => Ok(*byte),
            _ => Err(format!("separator must be a single ASCII character, got '{value}'")),
        },
    }
}
