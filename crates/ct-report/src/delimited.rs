//! Tab-delimited report output.

use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::Path;

use anyhow::{Context, Result};
use ct_model::{REPORT_COLUMNS, TerminologyReport};
use tracing::info;

/// Renders the report as tab-delimited text: one header line, then one
/// line per report row, `\n` terminated.
pub fn render_delimited(report: &TerminologyReport) -> String {
    let mut out = String::new();
    out.push_str(&REPORT_COLUMNS.join("\t"));
    out.push('\n');
    for row in report.rows() {
        out.push_str(&row.join("\t"));
        out.push('\n');
    }
    out
}

/// Writes the tab-delimited report to `path`, creating parent
/// directories as needed.
pub fn write_delimited(report: &TerminologyReport, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)
                .with_context(|| format!("create {}", parent.display()))?;
        }
    }
    let file = File::create(path).with_context(|| format!("create {}", path.display()))?;
    let mut writer = BufWriter::new(file);
    writer
        .write_all(render_delimited(report).as_bytes())
        .and_then(|()| writer.flush())
        .with_context(|| format!("write {}", path.display()))?;

    info!(
        path = %path.display(),
        codelists = report.codelist_count(),
        elements = report.element_count(),
        "wrote delimited report"
    );
    Ok(())
}
