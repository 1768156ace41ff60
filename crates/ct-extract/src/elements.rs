//! Per-element metadata resolution within one codelist.
//!
//! An element concept shared by several codelists carries one CDISC
//! preferred term per codelist; the right one for this codelist is the
//! candidate whose `source-code` qualifier names the codelist's NCI
//! abbreviation. Elements that resolve nothing are reported and
//! dropped.

use ct_model::{Finding, FindingKind, FindingLog};
use ct_thesaurus::{ConceptId, Thesaurus, categories, qualifiers};

use crate::codelists::CodelistMeta;
use crate::resolve::{
    QualifierConstraint, groups, last_value, matching_properties, matching_values,
    source_and_group, sources,
};

/// Outcome of submission value resolution for one element.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmissionValue {
    Resolved(String),
    Unresolved(UnresolvedSubmission),
}

/// Why an element failed to resolve a submission value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnresolvedSubmission {
    /// No CDISC preferred term at all.
    NoCandidates,
    /// Several CDISC preferred terms, none tagged with the codelist's
    /// NCI abbreviation.
    NoSourceCodeMatch { candidates: usize },
}

/// Resolved report metadata for one element of one codelist.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ElementMeta {
    pub concept: ConceptId,
    pub code: String,
    pub preferred_term: String,
    pub submission_value: SubmissionValue,
    /// CDISC synonyms, sorted ascending.
    pub synonyms: Vec<String>,
    pub definition: Option<String>,
}

impl ElementMeta {
    pub fn is_resolved(&self) -> bool {
        matches!(self.submission_value, SubmissionValue::Resolved(_))
    }
}

/// Resolves the non-deprecated members of `codelist`, recording a
/// finding for every element whose submission value stays unresolved.
pub fn build_elements(
    kb: &Thesaurus,
    codelist: &CodelistMeta,
    members: impl Iterator<Item = ConceptId>,
    findings: &mut FindingLog,
) -> Vec<ElementMeta> {
    members
        .filter(|&member| !kb.is_deprecated(member))
        .map(|member| {
            let meta = build_element(kb, codelist, member);
            if let SubmissionValue::Unresolved(reason) = meta.submission_value {
                findings.push(unresolved_finding(kb, codelist, &meta, reason));
            }
            meta
        })
        .collect()
}

/// Resolves one element against one codelist.
pub fn build_element(kb: &Thesaurus, codelist: &CodelistMeta, element: ConceptId) -> ElementMeta {
    let submission_value = resolve_submission_value(kb, codelist, element);

    let mut synonyms: Vec<String> = matching_values(
        kb,
        element,
        categories::FULL_SYN,
        &source_and_group(sources::CDISC, groups::SYNONYM),
    )
    .into_iter()
    .map(str::to_owned)
    .collect();
    synonyms.sort();

    let definition = last_value(
        kb,
        element,
        categories::ALT_DEFINITION,
        &[QualifierConstraint::new(
            qualifiers::DEF_SOURCE,
            sources::CDISC,
        )],
    )
    .map(str::to_owned);

    ElementMeta {
        concept: element,
        code: kb.code(element).to_string(),
        preferred_term: kb.preferred_name(element).to_string(),
        submission_value,
        synonyms,
        definition,
    }
}

/// A lone CDISC preferred term wins outright. With several, the first
/// one whose `source-code` equals the codelist's NCI abbreviation wins.
fn resolve_submission_value(
    kb: &Thesaurus,
    codelist: &CodelistMeta,
    element: ConceptId,
) -> SubmissionValue {
    let candidates = matching_properties(
        kb,
        element,
        categories::FULL_SYN,
        &source_and_group(sources::CDISC, groups::PREFERRED_TERM),
    );

    match candidates.as_slice() {
        [] => SubmissionValue::Unresolved(UnresolvedSubmission::NoCandidates),
        [only] => SubmissionValue::Resolved(only.value.clone()),
        _ => {
            let wanted = codelist.nci_abbreviation.as_deref();
            let matched = wanted.and_then(|abbreviation| {
                candidates
                    .iter()
                    .find(|candidate| candidate.has_qualifier(qualifiers::SOURCE_CODE, abbreviation))
            });
            match matched {
                Some(candidate) => SubmissionValue::Resolved(candidate.value.clone()),
                None => SubmissionValue::Unresolved(UnresolvedSubmission::NoSourceCodeMatch {
                    candidates: candidates.len(),
                }),
            }
        }
    }
}

fn unresolved_finding(
    kb: &Thesaurus,
    codelist: &CodelistMeta,
    meta: &ElementMeta,
    reason: UnresolvedSubmission,
) -> Finding {
    let detail = match reason {
        UnresolvedSubmission::NoCandidates => "no CDISC preferred term".to_string(),
        UnresolvedSubmission::NoSourceCodeMatch { candidates } => format!(
            "{candidates} CDISC preferred terms, none marked for this codelist"
        ),
    };
    Finding::warning(
        FindingKind::SubmissionValueUnresolved,
        format!("element dropped, {detail}"),
    )
    .with_codelist(&codelist.code)
    .with_concept(kb.name(meta.concept))
}

#[cfg(test)]
mod tests {
    use super::*;
    use ct_thesaurus::AnnotatedProperty;

    fn full_syn(value: &str, source: &str, group: &str) -> AnnotatedProperty {
        AnnotatedProperty::new(categories::FULL_SYN, value)
            .with_qualifier(qualifiers::TERM_SOURCE, source)
            .with_qualifier(qualifiers::TERM_GROUP, group)
    }

    fn submission_candidate(value: &str, source_code: &str) -> AnnotatedProperty {
        full_syn(value, "CDISC", "PT").with_qualifier(qualifiers::SOURCE_CODE, source_code)
    }

    fn arm_codelist(concept: ConceptId) -> CodelistMeta {
        CodelistMeta {
            concept,
            code: "C74456".to_string(),
            nci_preferred_term: Some("Arm".to_string()),
            nci_abbreviation: Some("ARMCD".to_string()),
            submission_value: Some("ARMCD".to_string()),
            display_name: Some("Arm Code".to_string()),
            extensible: Some("No".to_string()),
            definition: None,
        }
    }

    fn kb_with_codelist() -> (Thesaurus, CodelistMeta) {
        let mut kb = Thesaurus::new();
        let concept = kb.add_concept("Arm_List", "C74456");
        let codelist = arm_codelist(concept);
        (kb, codelist)
    }

    #[test]
    fn lone_candidate_wins_without_source_code() {
        let (mut kb, codelist) = kb_with_codelist();
        let element = kb.add_concept("Screen_Failure", "C49628");
        kb.add_property(element, full_syn("SCRNFAIL", "CDISC", "PT"));

        let meta = build_element(&kb, &codelist, element);
        assert_eq!(
            meta.submission_value,
            SubmissionValue::Resolved("SCRNFAIL".to_string())
        );
    }

    #[test]
    fn several_candidates_need_a_matching_source_code() {
        let (mut kb, codelist) = kb_with_codelist();
        let element = kb.add_concept("Planned_Arm", "C15538");
        kb.add_property(element, submission_candidate("ARM VALUE", "ARM"));
        kb.add_property(element, submission_candidate("ARMCD VALUE", "ARMCD"));

        let meta = build_element(&kb, &codelist, element);
        assert_eq!(
            meta.submission_value,
            SubmissionValue::Resolved("ARMCD VALUE".to_string())
        );
    }

    #[test]
    fn first_matching_candidate_wins() {
        let (mut kb, codelist) = kb_with_codelist();
        let element = kb.add_concept("Planned_Arm", "C15538");
        kb.add_property(element, submission_candidate("FIRST", "ARMCD"));
        kb.add_property(element, submission_candidate("SECOND", "ARMCD"));

        let meta = build_element(&kb, &codelist, element);
        assert_eq!(
            meta.submission_value,
            SubmissionValue::Resolved("FIRST".to_string())
        );
    }

    #[test]
    fn no_candidates_is_reported_and_unresolved() {
        let (mut kb, codelist) = kb_with_codelist();
        let element = kb.add_concept("Planned_Arm", "C15538");

        let mut findings = FindingLog::default();
        let metas = build_elements(&kb, &codelist, [element].into_iter(), &mut findings);

        assert_eq!(metas.len(), 1);
        assert!(!metas[0].is_resolved());
        let reported: Vec<_> = findings
            .of_kind(FindingKind::SubmissionValueUnresolved)
            .collect();
        assert_eq!(reported.len(), 1);
        assert_eq!(reported[0].concept.as_deref(), Some("Planned_Arm"));
    }

    #[test]
    fn ambiguous_candidates_without_source_code_match_are_unresolved() {
        let (mut kb, codelist) = kb_with_codelist();
        let element = kb.add_concept("Planned_Arm", "C15538");
        kb.add_property(element, submission_candidate("A", "TRTA"));
        kb.add_property(element, submission_candidate("B", "TRTB"));

        let meta = build_element(&kb, &codelist, element);
        assert_eq!(
            meta.submission_value,
            SubmissionValue::Unresolved(UnresolvedSubmission::NoSourceCodeMatch { candidates: 2 })
        );
    }

    #[test]
    fn deprecated_members_are_skipped_silently() {
        let (mut kb, codelist) = kb_with_codelist();
        let live = kb.add_concept("Planned_Arm", "C15538");
        kb.add_property(live, full_syn("ARM A", "CDISC", "PT"));
        let retired = kb.add_concept("Old_Arm", "C1111");
        kb.add_property(retired, full_syn("OLD", "CDISC", "PT"));
        kb.add_property(
            retired,
            AnnotatedProperty::new(categories::CONCEPT_STATUS, "Retired_Concept"),
        );

        let mut findings = FindingLog::default();
        let metas = build_elements(&kb, &codelist, [live, retired].into_iter(), &mut findings);

        assert_eq!(metas.len(), 1);
        assert_eq!(metas[0].code, "C15538");
        assert!(findings.is_empty());
    }

    #[test]
    fn synonyms_sort_case_sensitively() {
        let (mut kb, codelist) = kb_with_codelist();
        let element = kb.add_concept("Severity_Moderate", "C41806");
        kb.add_property(element, full_syn("MODERATE", "CDISC", "PT"));
        for synonym in ["mild", "Severe", "Moderate"] {
            kb.add_property(element, full_syn(synonym, "CDISC", "SY"));
        }

        let meta = build_element(&kb, &codelist, element);
        assert_eq!(meta.synonyms, ["Moderate", "Severe", "mild"]);
    }

    #[test]
    fn element_definition_is_optional_and_last_wins() {
        let (mut kb, codelist) = kb_with_codelist();
        let element = kb.add_concept("Planned_Arm", "C15538");
        kb.add_property(element, full_syn("ARM A", "CDISC", "PT"));

        let mut findings = FindingLog::default();
        let metas = build_elements(&kb, &codelist, [element].into_iter(), &mut findings);
        assert_eq!(metas[0].definition, None);
        assert!(findings.is_empty());

        kb.add_property(
            element,
            AnnotatedProperty::new(categories::ALT_DEFINITION, "First.")
                .with_qualifier(qualifiers::DEF_SOURCE, "CDISC"),
        );
        kb.add_property(
            element,
            AnnotatedProperty::new(categories::ALT_DEFINITION, "Second.")
                .with_qualifier(qualifiers::DEF_SOURCE, "CDISC"),
        );
        let meta = build_element(&kb, &codelist, element);
        assert_eq!(meta.definition.as_deref(), Some("Second."));
    }
}
