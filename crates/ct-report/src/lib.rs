//! Report file writers.
//!
//! This crate renders an assembled [`ct_model::TerminologyReport`] into
//! the formats the publication workflow consumes:
//!
//! - **Delimited text**: the canonical tab-separated report file
//! - **Workbook**: a SpreadsheetML conversion of the written text file
//! - **Findings JSON**: machine-readable data-quality findings

mod delimited;
mod excel;
mod findings_json;

pub use delimited::{render_delimited, write_delimited};
pub use excel::convert_to_workbook;
pub use findings_json::{RootFindings, write_findings_json};
