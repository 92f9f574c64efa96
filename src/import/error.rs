//! Fatal import errors.

use thiserror::Error;

use crate::model::{ElementId, StoreError};

/// Errors that abort an import.
///
/// Everything here unwinds to the entry point and discards the mutation
/// window. Lossy-but-recoverable conditions are reported as
/// [`Diagnostic`](super::Diagnostic)s instead.
#[derive(Debug, Error)]
pub enum ImportError {
    /// The document does not have the minimal shape the walker requires, or
    /// is not well-formed XML.
    #[error("malformed document: {0}")]
    Malformed(String),

    /// Two distinct document nodes claimed the same identifier, or an
    /// identifier is already taken by an element of another kind.
    #[error("duplicate identifier: {0}")]
    DuplicateIdentifier(ElementId),

    /// The zipped project could not be unpacked.
    #[error("archive error: {0}")]
    Archive(String),

    /// The input file's extension names no known format.
    #[error("unsupported format: {0}")]
    UnsupportedFormat(String),

    /// IO error while reading the input.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl ImportError {
    /// Create a malformed-document error.
    pub fn malformed(message: impl Into<String>) -> Self {
        Self::Malformed(message.into())
    }

    /// Create an archive error.
    pub fn archive(message: impl Into<String>) -> Self {
        Self::Archive(message.into())
    }
}

impl From<StoreError> for ImportError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::DuplicateIdentifier(id) => Self::DuplicateIdentifier(id),
        }
    }
}

/// Result alias for fallible import steps.
pub type ImportResult<T> = Result<T, ImportError>;
