//! Error types for template rendering.

use std::path::PathBuf;

/// Errors that can occur while rendering a template or writing its output.
#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    /// A placeholder referenced a variable absent from the binding set.
    #[error("missing template variable '{name}' at byte {offset}")]
    MissingVariable {
        /// The unbound variable name.
        name: String,
        /// Byte offset of the placeholder in the template source.
        offset: usize,
    },

    /// A `{{` opener with no matching `}}` closer.
    #[error("unterminated placeholder at byte {0}")]
    UnterminatedPlaceholder(usize),

    /// The rendered output could not be written.
    #[error("failed to write '{path}': {source}")]
    WriteFailed {
        /// Destination path of the failed write.
        path: PathBuf,
        /// The underlying I/O error.
        source: std::io::Error,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_missing_variable() {
        let err = RenderError::MissingVariable {
            name: "project".to_string(),
            offset: 17,
        };
        assert_eq!(
            format!("{err}"),
            "missing template variable 'project' at byte 17"
        );
    }

    #[test]
    fn display_unterminated() {
        assert_eq!(
            format!("{}", RenderError::UnterminatedPlaceholder(3)),
            "unterminated placeholder at byte 3"
        );
    }
}
