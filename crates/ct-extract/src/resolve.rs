//! Qualifier-constrained lookup over annotated concept properties.
//!
//! Terminology exports carry several values per property category on a
//! single concept (one `FULL_SYN` per source/group pairing, one
//! `ALT_DEFINITION` per source). Consumers never want "the" value of a
//! category; they want the values whose qualifiers match a constraint
//! set. This module is the one place that filtering happens.

use ct_thesaurus::{AnnotatedProperty, ConceptId, Thesaurus, qualifiers};

/// Well-known `term-source` qualifier values.
pub mod sources {
    pub const NCI: &str = "NCI";
    pub const CDISC: &str = "CDISC";
}

/// Well-known `term-group` qualifier values.
pub mod groups {
    pub const PREFERRED_TERM: &str = "PT";
    pub const SYNONYM: &str = "SY";
    pub const ABBREVIATION: &str = "AB";
}

/// One qualifier a candidate property must carry, by exact name and value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QualifierConstraint<'a> {
    pub name: &'a str,
    pub value: &'a str,
}

impl<'a> QualifierConstraint<'a> {
    pub fn new(name: &'a str, value: &'a str) -> Self {
        Self { name, value }
    }
}

/// The usual `FULL_SYN` constraint pair: `term-source` plus `term-group`.
pub fn source_and_group<'a>(source: &'a str, group: &'a str) -> [QualifierConstraint<'a>; 2] {
    [
        QualifierConstraint::new(qualifiers::TERM_SOURCE, source),
        QualifierConstraint::new(qualifiers::TERM_GROUP, group),
    ]
}

/// Properties of `category` on `concept` satisfying every constraint, in
/// the order the export declared them. A property with repeated
/// qualifier names matches if any occurrence carries the wanted value.
pub fn matching_properties<'kb>(
    kb: &'kb Thesaurus,
    concept: ConceptId,
    category: &str,
    constraints: &[QualifierConstraint<'_>],
) -> Vec<&'kb AnnotatedProperty> {
    kb.properties(concept)
        .iter()
        .filter(|property| property.category == category)
        .filter(|property| {
            constraints
                .iter()
                .all(|constraint| property.has_qualifier(constraint.name, constraint.value))
        })
        .collect()
}

/// Like [`matching_properties`], values only.
pub fn matching_values<'kb>(
    kb: &'kb Thesaurus,
    concept: ConceptId,
    category: &str,
    constraints: &[QualifierConstraint<'_>],
) -> Vec<&'kb str> {
    matching_properties(kb, concept, category, constraints)
        .into_iter()
        .map(|property| property.value.as_str())
        .collect()
}

/// First matching value in declaration order, if any.
pub fn first_value<'kb>(
    kb: &'kb Thesaurus,
    concept: ConceptId,
    category: &str,
    constraints: &[QualifierConstraint<'_>],
) -> Option<&'kb str> {
    matching_values(kb, concept, category, constraints)
        .into_iter()
        .next()
}

/// Last matching value in declaration order, if any. Categories that an
/// export accidentally repeats resolve to the final declaration.
pub fn last_value<'kb>(
    kb: &'kb Thesaurus,
    concept: ConceptId,
    category: &str,
    constraints: &[QualifierConstraint<'_>],
) -> Option<&'kb str> {
    matching_values(kb, concept, category, constraints)
        .into_iter()
        .next_back()
}
