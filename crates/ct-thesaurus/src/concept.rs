/// Property categories used by the export format.
pub mod categories {
    pub const CODE: &str = "code";
    pub const PREFERRED_NAME: &str = "Preferred_Name";
    pub const CONCEPT_STATUS: &str = "Concept_Status";
    pub const FULL_SYN: &str = "FULL_SYN";
    pub const ALT_DEFINITION: &str = "ALT_DEFINITION";
    pub const EXTENSIBLE_LIST: &str = "Extensible_List";
}

/// Qualifier names attached to complex term and definition properties.
pub mod qualifiers {
    pub const TERM_SOURCE: &str = "term-source";
    pub const TERM_GROUP: &str = "term-group";
    pub const SOURCE_CODE: &str = "source-code";
    pub const DEF_SOURCE: &str = "def-source";
}

/// Opaque handle to a concept in a [`Thesaurus`](crate::Thesaurus).
///
/// Handles order by store insertion, which follows document order of the
/// loaded export.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ConceptId(pub(crate) u32);

impl ConceptId {
    pub(crate) fn index(self) -> usize {
        self.0 as usize
    }
}

/// A (name, value) pair narrowing the meaning of a property instance.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Qualifier {
    pub name: String,
    pub value: String,
}

/// One property instance of a concept. A concept may carry many properties
/// of the same category; qualifiers disambiguate among them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnnotatedProperty {
    pub category: String,
    pub value: String,
    /// Qualifiers in document order.
    pub qualifiers: Vec<Qualifier>,
}

impl AnnotatedProperty {
    pub fn new(category: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            category: category.into(),
            value: value.into(),
            qualifiers: Vec::new(),
        }
    }

    pub fn with_qualifier(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.qualifiers.push(Qualifier {
            name: name.into(),
            value: value.into(),
        });
        self
    }

    /// Value of the first qualifier with the given name.
    pub fn qualifier(&self, name: &str) -> Option<&str> {
        self.qualifiers
            .iter()
            .find(|q| q.name == name)
            .map(|q| q.value.as_str())
    }

    /// True when some qualifier with the given name carries the given value.
    pub fn has_qualifier(&self, name: &str, value: &str) -> bool {
        self.qualifiers
            .iter()
            .any(|q| q.name == name && q.value == value)
    }
}

/// Outbound typed relationship of a concept; the source is the concept the
/// association is stored under.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Association {
    pub kind: String,
    pub target: ConceptId,
}
