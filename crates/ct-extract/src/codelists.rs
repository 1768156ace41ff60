//! Codelist discovery and per-codelist metadata resolution.
//!
//! Every descendant of the report root is treated as a codelist
//! candidate. Metadata comes from qualifier-constrained `FULL_SYN`,
//! `ALT_DEFINITION` and `Extensible_List` lookups; anything irregular
//! about a candidate is recorded as a finding rather than aborting the
//! run.

use std::collections::btree_map::Entry;
use std::collections::BTreeMap;

use ct_model::{Finding, FindingKind, FindingLog};
use ct_thesaurus::{ConceptId, Thesaurus, categories, qualifiers};
use tracing::debug;

use crate::resolve::{
    QualifierConstraint, first_value, groups, last_value, matching_values, source_and_group,
    sources,
};

/// Terminology roots whose publication conventions allow submission
/// values longer than [`MAX_SUBMISSION_VALUE_LEN`].
pub const LENGTH_EXEMPT_ROOTS: [&str; 4] = [
    "CDISC_Questionnaire_Terminology",
    "CDISC_Functional_Test_Terminology",
    "CDISC_Clinical_Classification_Terminology",
    "CDISC_COA_Terminology",
];

/// Submission value length ceiling for non-exempt terminologies.
pub const MAX_SUBMISSION_VALUE_LEN: usize = 8;

/// OWL bottom class; subclass axioms can surface it as a descendant.
const NOTHING: &str = "Nothing";

/// Resolved publication metadata for one codelist concept.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CodelistMeta {
    pub concept: ConceptId,
    pub code: String,
    /// NCI preferred term, shown in the summary row.
    pub nci_preferred_term: Option<String>,
    /// NCI abbreviation; the disambiguation key for element submission
    /// values.
    pub nci_abbreviation: Option<String>,
    /// CDISC preferred term, the codelist's own submission value.
    pub submission_value: Option<String>,
    /// CDISC display synonym; doubles as codelist name and report key.
    pub display_name: Option<String>,
    pub extensible: Option<String>,
    pub definition: Option<String>,
}

/// All codelists under one root, plus the display-name ordering index.
#[derive(Debug, Default)]
pub struct CodelistSet {
    metas: Vec<CodelistMeta>,
    /// Lowercased display name to index into `metas`; first name seen
    /// keeps the slot.
    name_index: BTreeMap<String, usize>,
}

impl CodelistSet {
    /// Codelist concepts in traversal order, named or not. Membership
    /// scanning covers all of them.
    pub fn concept_ids(&self) -> impl Iterator<Item = ConceptId> + '_ {
        self.metas.iter().map(|meta| meta.concept)
    }

    /// Codelists that resolved a display name, in case-insensitive
    /// ascending name order.
    pub fn in_display_order(&self) -> impl Iterator<Item = &CodelistMeta> {
        self.name_index.values().map(|&index| &self.metas[index])
    }

    pub fn metas(&self) -> &[CodelistMeta] {
        &self.metas
    }

    pub fn len(&self) -> usize {
        self.metas.len()
    }

    pub fn is_empty(&self) -> bool {
        self.metas.is_empty()
    }

    /// Number of codelists that will appear in the report.
    pub fn named_len(&self) -> usize {
        self.name_index.len()
    }
}

/// Whether submission value lengths are checked under `root`.
pub fn enforces_value_length(kb: &Thesaurus, root: ConceptId) -> bool {
    !LENGTH_EXEMPT_ROOTS.contains(&kb.name(root))
}

/// Discovers the codelists under `root` and resolves their metadata.
pub fn build_codelists(kb: &Thesaurus, root: ConceptId, findings: &mut FindingLog) -> CodelistSet {
    let check_length = enforces_value_length(kb, root);
    let mut set = CodelistSet::default();

    for concept in kb.descendants(root) {
        if kb.name(concept) == NOTHING {
            continue;
        }
        let meta = resolve_meta(kb, concept, check_length, findings);
        register(&mut set, kb, meta, findings);
    }

    debug!(
        candidates = set.len(),
        named = set.named_len(),
        "resolved codelist metadata"
    );
    set
}

fn resolve_meta(
    kb: &Thesaurus,
    concept: ConceptId,
    check_length: bool,
    findings: &mut FindingLog,
) -> CodelistMeta {
    let code = kb.code(concept).to_string();

    let nci_preferred_term = last_value(
        kb,
        concept,
        categories::FULL_SYN,
        &source_and_group(sources::NCI, groups::PREFERRED_TERM),
    )
    .map(str::to_owned);
    let nci_abbreviation = last_value(
        kb,
        concept,
        categories::FULL_SYN,
        &source_and_group(sources::NCI, groups::ABBREVIATION),
    )
    .map(str::to_owned);
    let submission_value = last_value(
        kb,
        concept,
        categories::FULL_SYN,
        &source_and_group(sources::CDISC, groups::PREFERRED_TERM),
    )
    .map(str::to_owned);
    let display_name = first_value(
        kb,
        concept,
        categories::FULL_SYN,
        &source_and_group(sources::CDISC, groups::SYNONYM),
    )
    .map(str::to_owned);

    if check_length {
        if let Some(value) = &submission_value {
            if value.chars().count() > MAX_SUBMISSION_VALUE_LEN {
                findings.push(
                    Finding::warning(
                        FindingKind::SubmissionValueTooLong,
                        format!(
                            "codelist submission value '{value}' exceeds {MAX_SUBMISSION_VALUE_LEN} characters"
                        ),
                    )
                    .with_codelist(&code)
                    .with_concept(kb.name(concept)),
                );
            }
        }
    }

    let extensible = resolve_extensibility(kb, concept, &code, findings);
    let definition = resolve_definition(kb, concept, &code, findings);

    CodelistMeta {
        concept,
        code,
        nci_preferred_term,
        nci_abbreviation,
        submission_value,
        display_name,
        extensible,
        definition,
    }
}

/// A codelist states its extensibility exactly once; zero or several
/// declarations leave the report cell blank.
fn resolve_extensibility(
    kb: &Thesaurus,
    concept: ConceptId,
    code: &str,
    findings: &mut FindingLog,
) -> Option<String> {
    let values = matching_values(kb, concept, categories::EXTENSIBLE_LIST, &[]);
    match values.as_slice() {
        [] => {
            findings.push(
                Finding::warning(
                    FindingKind::ExtensibilityMissing,
                    "codelist declares no extensibility",
                )
                .with_codelist(code)
                .with_concept(kb.name(concept)),
            );
            None
        }
        [value] => Some((*value).to_owned()),
        _ => {
            findings.push(
                Finding::warning(
                    FindingKind::ExtensibilityConflict,
                    format!("codelist declares extensibility {} times", values.len()),
                )
                .with_codelist(code)
                .with_concept(kb.name(concept)),
            );
            None
        }
    }
}

fn resolve_definition(
    kb: &Thesaurus,
    concept: ConceptId,
    code: &str,
    findings: &mut FindingLog,
) -> Option<String> {
    let constraints = [QualifierConstraint::new(
        qualifiers::DEF_SOURCE,
        sources::CDISC,
    )];
    let values = matching_values(kb, concept, categories::ALT_DEFINITION, &constraints);
    match values.as_slice() {
        [] => {
            findings.push(
                Finding::warning(FindingKind::DefinitionMissing, "codelist has no definition")
                    .with_codelist(code)
                    .with_concept(kb.name(concept)),
            );
            None
        }
        [value] => Some((*value).to_owned()),
        _ => {
            findings.push(
                Finding::warning(
                    FindingKind::DefinitionConflict,
                    format!("codelist carries {} definitions, keeping the last", values.len()),
                )
                .with_codelist(code)
                .with_concept(kb.name(concept)),
            );
            values.last().map(|value| (*value).to_owned())
        }
    }
}

fn register(set: &mut CodelistSet, kb: &Thesaurus, meta: CodelistMeta, findings: &mut FindingLog) {
    let index = set.metas.len();
    match &meta.display_name {
        None => {
            findings.push(
                Finding::warning(
                    FindingKind::CodelistNameMissing,
                    "codelist has no display synonym and is left out of the report",
                )
                .with_codelist(&meta.code)
                .with_concept(kb.name(meta.concept)),
            );
        }
        Some(name) => match set.name_index.entry(name.to_lowercase()) {
            Entry::Vacant(slot) => {
                slot.insert(index);
            }
            Entry::Occupied(slot) => {
                let kept = &set.metas[*slot.get()];
                findings.push(
                    Finding::warning(
                        FindingKind::CodelistNameCollision,
                        format!(
                            "display name '{name}' already used by codelist {}",
                            kept.code
                        ),
                    )
                    .with_codelist(&meta.code)
                    .with_concept(kb.name(meta.concept)),
                );
            }
        },
    }
    set.metas.push(meta);
}
