//! In-memory concept store with the query surface the extraction pipeline
//! consumes: property lookup, hierarchy traversal, association scans and
//! identifier resolution.

use std::collections::{HashMap, HashSet, VecDeque};

use crate::concept::{AnnotatedProperty, Association, ConceptId, categories};

/// `Concept_Status` values that mark a concept as withdrawn.
const DEPRECATED_STATUSES: [&str; 2] = ["Retired_Concept", "Obsolete_Concept"];

#[derive(Debug, Default)]
struct ConceptRecord {
    name: String,
    code: String,
    preferred_name: Option<String>,
    properties: Vec<AnnotatedProperty>,
    parents: Vec<ConceptId>,
    children: Vec<ConceptId>,
    associations: Vec<Association>,
}

/// A fully loaded, read-only ontology snapshot.
///
/// Concepts are addressed by opaque [`ConceptId`] handles; symbolic names
/// and codes resolve to handles via [`Thesaurus::resolve`]. Iteration
/// orders are stable: handles enumerate in insertion (document) order and
/// per-concept sequences keep their load order.
#[derive(Debug, Default)]
pub struct Thesaurus {
    records: Vec<ConceptRecord>,
    by_name: HashMap<String, ConceptId>,
    by_code: HashMap<String, ConceptId>,
}

impl Thesaurus {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a concept and returns its handle. Returns the existing
    /// handle when the name is already present.
    pub fn add_concept(&mut self, name: impl Into<String>, code: impl Into<String>) -> ConceptId {
        let name = name.into();
        if let Some(&id) = self.by_name.get(&name) {
            return id;
        }
        let id = ConceptId(self.records.len() as u32);
        let code = code.into();
        self.by_code.entry(code.clone()).or_insert(id);
        self.by_name.insert(name.clone(), id);
        self.records.push(ConceptRecord {
            name,
            code,
            ..ConceptRecord::default()
        });
        id
    }

    pub fn set_preferred_name(&mut self, id: ConceptId, preferred_name: impl Into<String>) {
        self.records[id.index()].preferred_name = Some(preferred_name.into());
    }

    pub fn add_property(&mut self, id: ConceptId, property: AnnotatedProperty) {
        self.records[id.index()].properties.push(property);
    }

    /// Records a subclass edge; the child also becomes visible from the
    /// parent for descendant traversal.
    pub fn add_parent(&mut self, child: ConceptId, parent: ConceptId) {
        self.records[child.index()].parents.push(parent);
        self.records[parent.index()].children.push(child);
    }

    pub fn add_association(
        &mut self,
        source: ConceptId,
        kind: impl Into<String>,
        target: ConceptId,
    ) {
        self.records[source.index()].associations.push(Association {
            kind: kind.into(),
            target,
        });
    }

    /// Resolves a root identifier: symbolic name first, then concept code.
    pub fn resolve(&self, identifier: &str) -> Option<ConceptId> {
        self.by_name
            .get(identifier)
            .or_else(|| self.by_code.get(identifier))
            .copied()
    }

    pub fn name(&self, id: ConceptId) -> &str {
        &self.records[id.index()].name
    }

    pub fn code(&self, id: ConceptId) -> &str {
        &self.records[id.index()].code
    }

    /// Human-readable preferred name; falls back to the symbolic name when
    /// the export carries none.
    pub fn preferred_name(&self, id: ConceptId) -> &str {
        let record = &self.records[id.index()];
        record.preferred_name.as_deref().unwrap_or(&record.name)
    }

    pub fn is_deprecated(&self, id: ConceptId) -> bool {
        self.records[id.index()]
            .properties
            .iter()
            .any(|property| {
                property.category == categories::CONCEPT_STATUS
                    && DEPRECATED_STATUSES.contains(&property.value.as_str())
            })
    }

    pub fn properties(&self, id: ConceptId) -> &[AnnotatedProperty] {
        &self.records[id.index()].properties
    }

    /// Properties of one category, in load order.
    pub fn properties_named<'a>(
        &'a self,
        id: ConceptId,
        category: &'a str,
    ) -> impl Iterator<Item = &'a AnnotatedProperty> {
        self.records[id.index()]
            .properties
            .iter()
            .filter(move |property| property.category == category)
    }

    pub fn parents(&self, id: ConceptId) -> &[ConceptId] {
        &self.records[id.index()].parents
    }

    pub fn children(&self, id: ConceptId) -> &[ConceptId] {
        &self.records[id.index()].children
    }

    /// All transitive descendants of a concept, excluding the concept
    /// itself, in breadth-first encounter order. Diamond-shaped hierarchies
    /// yield each descendant once.
    pub fn descendants(&self, id: ConceptId) -> Vec<ConceptId> {
        let mut found = Vec::new();
        let mut seen = HashSet::new();
        let mut queue: VecDeque<ConceptId> = self.children(id).iter().copied().collect();
        while let Some(current) = queue.pop_front() {
            if seen.insert(current) {
                found.push(current);
                queue.extend(self.children(current).iter().copied());
            }
        }
        found
    }

    pub fn associations(&self, id: ConceptId) -> &[Association] {
        &self.records[id.index()].associations
    }

    /// All concept handles in insertion order.
    pub fn concepts(&self) -> impl Iterator<Item = ConceptId> {
        (0..self.records.len() as u32).map(ConceptId)
    }

    pub fn concept_count(&self) -> usize {
        self.records.len()
    }

    pub fn property_count(&self) -> usize {
        self.records.iter().map(|r| r.properties.len()).sum()
    }

    pub fn association_count(&self) -> usize {
        self.records.iter().map(|r| r.associations.len()).sum()
    }

    pub fn deprecated_count(&self) -> usize {
        self.concepts().filter(|&id| self.is_deprecated(id)).count()
    }
}
