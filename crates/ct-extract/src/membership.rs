//! Codelist membership, built from one pass over every association in
//! the store.
//!
//! Membership is declared on the member: an element concept carries a
//! `Concept_In_Subset` association pointing at its codelist. Walking a
//! codelist's own edges therefore finds nothing; the index has to be
//! inverted from a global scan, restricted to the codelists under the
//! current root.

use std::collections::{BTreeSet, HashMap, HashSet};

use ct_thesaurus::{ConceptId, Thesaurus};
use tracing::debug;

use crate::codelists::CodelistSet;

/// Association kind linking an element to a codelist it belongs to.
pub const MEMBER_OF_CODELIST: &str = "Concept_In_Subset";

/// Codelist concept to its member concepts.
#[derive(Debug, Default)]
pub struct MembershipIndex {
    members: HashMap<ConceptId, BTreeSet<ConceptId>>,
}

impl MembershipIndex {
    /// Members of `codelist` in deterministic store order; empty when
    /// the codelist has none.
    pub fn members_of(&self, codelist: ConceptId) -> impl Iterator<Item = ConceptId> + '_ {
        self.members.get(&codelist).into_iter().flatten().copied()
    }

    pub fn member_count(&self, codelist: ConceptId) -> usize {
        self.members.get(&codelist).map_or(0, BTreeSet::len)
    }

    /// Total membership edges across all indexed codelists.
    pub fn edge_count(&self) -> usize {
        self.members.values().map(BTreeSet::len).sum()
    }
}

/// Scans every concept's associations and keeps the `Concept_In_Subset`
/// edges whose target is one of the discovered codelists. Repeated
/// declarations of the same edge collapse.
pub fn build_membership(kb: &Thesaurus, codelists: &CodelistSet) -> MembershipIndex {
    let scope: HashSet<ConceptId> = codelists.concept_ids().collect();
    let mut index = MembershipIndex::default();

    for source in kb.concepts() {
        for association in kb.associations(source) {
            if association.kind == MEMBER_OF_CODELIST && scope.contains(&association.target) {
                index
                    .members
                    .entry(association.target)
                    .or_default()
                    .insert(source);
            }
        }
    }

    debug!(
        codelists = index.members.len(),
        edges = index.edge_count(),
        "indexed codelist membership"
    );
    index
}
