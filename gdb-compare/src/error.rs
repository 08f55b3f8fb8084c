//! Error types for schema document loading and parsing

use std::path::PathBuf;

use thiserror::Error;

/// Result type for schema operations
pub type Result<T> = std::result::Result<T, SchemaError>;

/// Errors raised while loading or normalizing a workspace schema document
#[derive(Error, Debug)]
pub enum SchemaError {
    #[error("Failed to read schema document {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Malformed schema document: {0}")]
    Malformed(#[from] roxmltree::Error),

    #[error("{category} element is missing its {tag} property")]
    MissingElement {
        category: &'static str,
        tag: &'static str,
    },

    /// A topology or relationship rule names a class ID with no
    /// feature class or table in the same document
    #[error("'{owner}' references unknown class id {id}")]
    UnresolvedClassId { owner: String, id: String },
}
