//! Error types for ensemble loading and validation.

/// Errors that can occur when loading or validating an ensemble description.
#[derive(Debug, thiserror::Error)]
pub enum ModelError {
    /// An I/O error occurred while reading the ensemble file.
    #[error("failed to read ensemble: {0}")]
    IoError(#[from] std::io::Error),

    /// The JSON content could not be parsed.
    #[error("failed to parse ensemble: {0}")]
    ParseError(String),

    /// The ensemble contains no trees at all.
    #[error("ensemble has no trees")]
    EmptyEnsemble,

    /// A tree's parallel node arrays have inconsistent lengths.
    #[error("tree {class}/{index} has ragged node arrays")]
    RaggedTree {
        /// The class the tree belongs to.
        class: usize,
        /// The tree's index within its class.
        index: usize,
    },

    /// An ensemble-level scalar is inconsistent with the tree structure.
    #[error("invalid ensemble metadata: {0}")]
    InvalidMetadata(String),
}
