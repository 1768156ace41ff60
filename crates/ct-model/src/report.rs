use serde::{Deserialize, Serialize};

/// Column order of the terminology report, fixed by the submission
/// pipelines that consume these files.
pub const REPORT_COLUMNS: [&str; 8] = [
    "Code",
    "Codelist Code",
    "Codelist Extensible (Yes/No)",
    "Codelist Name",
    "CDISC Submission Value",
    "CDISC Synonym(s)",
    "CDISC Definition",
    "NCI Preferred Term",
];

/// Separator between an element's synonyms in the rendered cell.
pub const SYNONYM_SEPARATOR: &str = "; ";

/// One permissible value of a codelist.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Element {
    /// NCI concept code (e.g., "C25301").
    pub code: String,
    /// Code of the owning codelist.
    pub codelist_code: String,
    /// Resolved CDISC submission value.
    pub submission_value: String,
    /// CDISC synonyms, case-sensitively sorted ascending.
    pub synonyms: Vec<String>,
    /// CDISC definition, absent when the source concept carries none.
    pub definition: Option<String>,
    /// NCI preferred term.
    pub preferred_term: String,
}

/// A codelist with its resolved metadata and ordered members.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Codelist {
    /// NCI concept code (e.g., "C66767").
    pub code: String,
    /// CDISC display synonym; the externally visible codelist name and the
    /// report ordering key.
    pub name: String,
    /// CDISC submission value of the codelist itself.
    pub submission_value: Option<String>,
    /// Extensibility flag as published ("Yes"/"No"), when resolved.
    pub extensible: Option<String>,
    pub definition: Option<String>,
    pub nci_preferred_term: Option<String>,
    /// Members in final row order.
    pub elements: Vec<Element>,
}

/// Fully assembled report for one root concept.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TerminologyReport {
    /// Symbolic name of the root concept; also the output file stem.
    pub root: String,
    /// Codelists in final report order.
    pub codelists: Vec<Codelist>,
}

impl Element {
    /// Renders the synonym cell: sorted values joined with `"; "`.
    pub fn synonym_cell(&self) -> String {
        self.synonyms.join(SYNONYM_SEPARATOR)
    }

    /// Detail row for this element under its owning codelist.
    pub fn row(&self, codelist_name: &str) -> [String; 8] {
        [
            self.code.clone(),
            self.codelist_code.clone(),
            String::new(),
            codelist_name.to_string(),
            self.submission_value.clone(),
            self.synonym_cell(),
            self.definition.clone().unwrap_or_default(),
            self.preferred_term.clone(),
        ]
    }
}

impl Codelist {
    /// Summary row. The codelist name fills both the "Codelist Name" and
    /// the "CDISC Synonym(s)" columns; the duplication is part of the
    /// published format.
    pub fn summary_row(&self) -> [String; 8] {
        [
            self.code.clone(),
            String::new(),
            self.extensible.clone().unwrap_or_default(),
            self.name.clone(),
            self.submission_value.clone().unwrap_or_default(),
            self.name.clone(),
            self.definition.clone().unwrap_or_default(),
            self.nci_preferred_term.clone().unwrap_or_default(),
        ]
    }
}

impl TerminologyReport {
    pub fn codelist_count(&self) -> usize {
        self.codelists.len()
    }

    pub fn element_count(&self) -> usize {
        self.codelists.iter().map(|c| c.elements.len()).sum()
    }

    /// All data rows in file order: per codelist, the summary row followed
    /// by its element rows. The header is not included.
    pub fn rows(&self) -> Vec<[String; 8]> {
        let mut rows = Vec::with_capacity(self.codelist_count() + self.element_count());
        for codelist in &self.codelists {
            rows.push(codelist.summary_row());
            for element in &codelist.elements {
                rows.push(element.row(&codelist.name));
            }
        }
        rows
    }
}
