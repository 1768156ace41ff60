use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Error,
    Warning,
}

/// Machine-readable category of a data-quality finding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FindingKind {
    /// Codelist submission value longer than 8 characters under a root
    /// where the length limit applies.
    SubmissionValueTooLong,
    /// Codelist resolved no extensibility value.
    ExtensibilityMissing,
    /// Codelist resolved more than one extensibility value.
    ExtensibilityConflict,
    /// Codelist resolved no CDISC definition.
    DefinitionMissing,
    /// Codelist resolved more than one CDISC definition.
    DefinitionConflict,
    /// Codelist resolved no CDISC display synonym and was left out of the
    /// report.
    CodelistNameMissing,
    /// A later codelist resolved a display synonym already claimed by an
    /// earlier one; the first mapping is kept.
    CodelistNameCollision,
    /// Two elements of one codelist resolved the same submission value;
    /// the later one replaced the earlier in the report rows.
    SubmissionValueCollision,
    /// An element had no disambiguable submission value and was dropped
    /// from the report rows.
    SubmissionValueUnresolved,
}

/// A data-quality finding recorded while building a report.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Finding {
    pub kind: FindingKind,
    pub severity: Severity,
    /// Code of the codelist the finding belongs to, when known.
    pub codelist: Option<String>,
    /// Symbolic name of the concept the finding is about.
    pub concept: Option<String>,
    pub message: String,
}

impl Finding {
    pub fn warning(kind: FindingKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            severity: Severity::Warning,
            codelist: None,
            concept: None,
            message: message.into(),
        }
    }

    pub fn with_codelist(mut self, code: impl Into<String>) -> Self {
        self.codelist = Some(code.into());
        self
    }

    pub fn with_concept(mut self, name: impl Into<String>) -> Self {
        self.concept = Some(name.into());
        self
    }
}

/// All findings collected during one report run.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FindingLog {
    pub findings: Vec<Finding>,
}

impl FindingLog {
    pub fn push(&mut self, finding: Finding) {
        self.findings.push(finding);
    }

    pub fn len(&self) -> usize {
        self.findings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.findings.is_empty()
    }

    pub fn error_count(&self) -> usize {
        self.findings
            .iter()
            .filter(|finding| finding.severity == Severity::Error)
            .count()
    }

    pub fn warning_count(&self) -> usize {
        self.findings
            .iter()
            .filter(|finding| finding.severity == Severity::Warning)
            .count()
    }

    pub fn has_errors(&self) -> bool {
        self.error_count() > 0
    }

    pub fn of_kind(&self, kind: FindingKind) -> impl Iterator<Item = &Finding> {
        self.findings
            .iter()
            .filter(move |finding| finding.kind == kind)
    }
}
