use std::path::PathBuf;

use ct_model::FindingLog;

#[derive(Debug)]
pub struct GenerateResult {
    pub thesaurus: PathBuf,
    pub output_dir: PathBuf,
    pub roots: Vec<RootSummary>,
    pub findings_json: Option<PathBuf>,
}

#[derive(Debug)]
pub struct RootSummary {
    pub root: String,
    pub codelist_count: usize,
    pub element_count: usize,
    pub findings: FindingLog,
    pub text_path: PathBuf,
    pub workbook_path: Option<PathBuf>,
}
