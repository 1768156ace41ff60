//! CLI argument definitions for the controlled terminology report writer.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use clap_verbosity_flag::{Verbosity, WarnLevel};
use colorchoice_clap::Color;

#[derive(Parser)]
#[command(
    name = "ct-reportwriter",
    version,
    about = "CDISC Controlled Terminology Report Writer",
    long_about = "Extract controlled terminology reports from an NCI Thesaurus export.\n\n\
                  Walks the subtree under each requested terminology root, resolves the\n\
                  codelists and their member terms, and writes one tab-delimited report\n\
                  plus an Excel workbook per root."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Adjust log verbosity (-v for debug, -vv for trace, -q for errors only).
    #[command(flatten)]
    pub verbosity: Verbosity<WarnLevel>,

    /// Control ANSI color output (auto, always, never).
    #[command(flatten)]
    pub color: Color,

    /// Explicit log level (overrides -v/-q flags).
    #[arg(long = "log-level", value_enum, global = true)]
    pub log_level: Option<LogLevelArg>,

    /// Log output format (pretty for human, json for machine parsing).
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
}

#[derive(Subcommand)]
pub enum Command {
    /// Generate terminology reports for one or more roots.
    Generate(GenerateArgs),

    /// Print size statistics and report roots for a thesaurus export.
    Inspect(InspectArgs),
}

#[derive(Parser)]
pub struct GenerateArgs {
    /// Path to the NCI Thesaurus export (RDF/XML).
    #[arg(value_name = "THESAURUS_FILE")]
    pub thesaurus: PathBuf,

    /// Terminology roots to report on, by symbolic name or concept code.
    #[arg(value_name = "ROOT", required = true)]
    pub roots: Vec<String>,

    /// Output directory for generated files
    /// (default: $CT_REPORTWRITER_OUTPUT_DIR, else the current directory).
    #[arg(long = "output-dir", value_name = "DIR")]
    pub output_dir: Option<PathBuf>,

    /// Skip the Excel workbook conversion.
    #[arg(long = "no-excel")]
    pub no_excel: bool,

    /// Write a machine-readable findings report to the given path.
    #[arg(long = "findings-json", value_name = "PATH")]
    pub findings_json: Option<PathBuf>,
}

#[derive(Parser)]
pub struct InspectArgs {
    /// Path to the NCI Thesaurus export (RDF/XML).
    #[arg(value_name = "THESAURUS_FILE")]
    pub thesaurus: PathBuf,
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
