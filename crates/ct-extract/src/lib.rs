//! Terminology report extraction over a loaded thesaurus.
//!
//! [`extract_report`] runs the whole pipeline for one root: discover
//! the codelists below it, index membership from the global association
//! scan, resolve element metadata and assemble the ordered report. The
//! pipeline never fails; irregular content surfaces as findings next to
//! the report.

#![deny(unsafe_code)]

use std::time::Instant;

use ct_model::{FindingLog, TerminologyReport};
use ct_thesaurus::{ConceptId, Thesaurus};
use tracing::{info, info_span, warn};

pub mod assemble;
pub mod codelists;
pub mod elements;
pub mod membership;
pub mod resolve;

pub use codelists::{CodelistMeta, CodelistSet, LENGTH_EXEMPT_ROOTS, build_codelists};
pub use elements::{ElementMeta, SubmissionValue, build_element, build_elements};
pub use membership::{MEMBER_OF_CODELIST, MembershipIndex, build_membership};
pub use resolve::{QualifierConstraint, matching_properties, matching_values};

/// Everything one extraction run produces.
#[derive(Debug)]
pub struct ExtractionOutcome {
    pub report: TerminologyReport,
    pub findings: FindingLog,
    pub stats: ExtractionStats,
}

/// Run counters, logged and shown in the CLI summary.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExtractionStats {
    /// Codelist candidates below the root.
    pub candidate_count: usize,
    /// Codelists that made it into the report.
    pub codelist_count: usize,
    /// Element rows across all codelists.
    pub element_count: usize,
    /// Membership edges found by the association scan.
    pub membership_edges: usize,
}

/// Extracts the terminology report rooted at `root`.
pub fn extract_report(kb: &Thesaurus, root: ConceptId) -> ExtractionOutcome {
    let span = info_span!("extract_report", root = %kb.name(root));
    let _guard = span.enter();
    let start = Instant::now();

    let mut findings = FindingLog::default();

    let codelists = info_span!("codelists").in_scope(|| build_codelists(kb, root, &mut findings));
    let membership = info_span!("membership").in_scope(|| build_membership(kb, &codelists));
    let report = info_span!("assemble")
        .in_scope(|| assemble::assemble_report(kb, root, &codelists, &membership, &mut findings));

    for finding in &findings.findings {
        warn!(
            kind = ?finding.kind,
            codelist = finding.codelist.as_deref().unwrap_or("-"),
            concept = finding.concept.as_deref().unwrap_or("-"),
            "{}",
            finding.message
        );
    }

    let stats = ExtractionStats {
        candidate_count: codelists.len(),
        codelist_count: report.codelist_count(),
        element_count: report.element_count(),
        membership_edges: membership.edge_count(),
    };

    info!(
        candidates = stats.candidate_count,
        codelists = stats.codelist_count,
        elements = stats.element_count,
        warnings = findings.warning_count(),
        duration_ms = start.elapsed().as_millis(),
        "extraction complete"
    );

    ExtractionOutcome {
        report,
        findings,
        stats,
    }
}
