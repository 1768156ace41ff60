//! Machine-readable findings output, one document per run covering
//! every requested root.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use chrono::Utc;
use ct_model::{Finding, FindingLog, TerminologyReport};
use serde::Serialize;
use tracing::info;

const FINDINGS_SCHEMA: &str = "ct-reportwriter.findings-report";
const FINDINGS_SCHEMA_VERSION: u32 = 1;

/// Findings and counters for one extracted root.
#[derive(Debug, Serialize)]
pub struct RootFindings {
    pub root: String,
    pub codelist_count: usize,
    pub element_count: usize,
    pub error_count: usize,
    pub warning_count: usize,
    pub findings: Vec<Finding>,
}

impl RootFindings {
    pub fn new(report: &TerminologyReport, findings: &FindingLog) -> Self {
        Self {
            root: report.root.clone(),
            codelist_count: report.codelist_count(),
            element_count: report.element_count(),
            error_count: findings.error_count(),
            warning_count: findings.warning_count(),
            findings: findings.findings.clone(),
        }
    }
}

#[derive(Debug, Serialize)]
struct FindingsDocument<'a> {
    schema: &'static str,
    schema_version: u32,
    generated_at: String,
    roots: &'a [RootFindings],
}

pub fn write_findings_json(path: &Path, roots: &[RootFindings]) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)
                .with_context(|| format!("create {}", parent.display()))?;
        }
    }
    let payload = FindingsDocument {
        schema: FINDINGS_SCHEMA,
        schema_version: FINDINGS_SCHEMA_VERSION,
        generated_at: Utc::now().to_rfc3339(),
        roots,
    };
    let json = serde_json::to_string_pretty(&payload).context("serialize findings")?;
    fs::write(path, format!("{json}\n")).with_context(|| format!("write {}", path.display()))?;

    info!(path = %path.display(), roots = roots.len(), "wrote findings report");
    Ok(())
}
