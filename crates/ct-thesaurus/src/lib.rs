#![deny(unsafe_code)]

pub mod concept;
pub mod error;
pub mod loader;
pub mod store;

pub use crate::concept::{AnnotatedProperty, Association, ConceptId, Qualifier};
pub use crate::concept::{categories, qualifiers};
pub use crate::error::LoadError;
pub use crate::loader::{load_export, read_export};
pub use crate::store::Thesaurus;
