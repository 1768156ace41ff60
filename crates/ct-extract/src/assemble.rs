//! Report assembly: codelist and element metadata become the final
//! ordered [`TerminologyReport`].
//!
//! Within a codelist, elements are keyed by submission value. The key
//! comparison is case sensitive, so values differing only in case each
//! keep a row; two elements resolving the byte-identical value collide
//! and the later one replaces the earlier, with a finding. Rows are
//! then emitted in case-insensitive ascending key order.

use std::collections::BTreeMap;
use std::collections::btree_map::Entry;

use ct_model::{Codelist, Element, Finding, FindingKind, FindingLog, TerminologyReport};
use ct_thesaurus::{ConceptId, Thesaurus};
use tracing::debug;

use crate::codelists::{CodelistMeta, CodelistSet};
use crate::elements::{ElementMeta, SubmissionValue, build_elements};
use crate::membership::MembershipIndex;

pub fn assemble_report(
    kb: &Thesaurus,
    root: ConceptId,
    codelists: &CodelistSet,
    membership: &MembershipIndex,
    findings: &mut FindingLog,
) -> TerminologyReport {
    let mut assembled = Vec::with_capacity(codelists.named_len());
    for meta in codelists.in_display_order() {
        let Some(name) = meta.display_name.as_deref() else {
            continue;
        };
        assembled.push(assemble_codelist(kb, meta, name, membership, findings));
    }

    debug!(codelists = assembled.len(), "assembled report");
    TerminologyReport {
        root: kb.name(root).to_string(),
        codelists: assembled,
    }
}

fn assemble_codelist(
    kb: &Thesaurus,
    meta: &CodelistMeta,
    name: &str,
    membership: &MembershipIndex,
    findings: &mut FindingLog,
) -> Codelist {
    let members = build_elements(kb, meta, membership.members_of(meta.concept), findings);

    let mut by_submission: BTreeMap<String, ElementMeta> = BTreeMap::new();
    for element in members {
        let SubmissionValue::Resolved(value) = element.submission_value.clone() else {
            continue;
        };
        match by_submission.entry(value.clone()) {
            Entry::Vacant(slot) => {
                slot.insert(element);
            }
            Entry::Occupied(mut slot) => {
                let replaced = slot.insert(element);
                findings.push(
                    Finding::warning(
                        FindingKind::SubmissionValueCollision,
                        format!(
                            "submission value '{value}' also resolved by {}, dropping this row",
                            slot.get().code
                        ),
                    )
                    .with_codelist(&meta.code)
                    .with_concept(kb.name(replaced.concept)),
                );
            }
        }
    }

    let mut keyed: Vec<(String, ElementMeta)> = by_submission.into_iter().collect();
    keyed.sort_by_key(|(value, _)| value.to_lowercase());

    let elements = keyed
        .into_iter()
        .map(|(value, element)| Element {
            code: element.code,
            codelist_code: meta.code.clone(),
            submission_value: value,
            synonyms: element.synonyms,
            definition: element.definition,
            preferred_term: element.preferred_term,
        })
        .collect();

    Codelist {
        code: meta.code.clone(),
        name: name.to_string(),
        submission_value: meta.submission_value.clone(),
        extensible: meta.extensible.clone(),
        definition: meta.definition.clone(),
        nci_preferred_term: meta.nci_preferred_term.clone(),
        elements,
    }
}
