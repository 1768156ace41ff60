#![deny(unsafe_code)]

use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    #[error("failed to read export {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed export XML near byte {position}: {source}")]
    Xml {
        position: u64,
        #[source]
        source: quick_xml::Error,
    },

    #[error("malformed export XML near byte {position}: {message}")]
    Structure { position: u64, message: String },

    #[error("concept {concept} has no code property")]
    MissingCode { concept: String },

    #[error("concept {concept} has conflicting code properties ({first} and {second})")]
    AmbiguousCode {
        concept: String,
        first: String,
        second: String,
    },
}

impl LoadError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    pub(crate) fn xml(position: u64, source: quick_xml::Error) -> Self {
        Self::Xml { position, source }
    }

    pub(crate) fn structure(position: u64, message: impl Into<String>) -> Self {
        Self::Structure {
            position,
            message: message.into(),
        }
    }
}
