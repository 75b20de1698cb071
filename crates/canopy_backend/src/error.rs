//! Error types for project generation.

use std::path::PathBuf;

/// Errors that can occur while generating an HLS project directory.
#[derive(Debug, thiserror::Error)]
pub enum BackendError {
    /// The configured output directory already exists.
    ///
    /// Builds never overwrite a previous project; callers pick a fresh,
    /// unique directory per build.
    #[error("output directory '{0}' already exists")]
    OutputDirExists(PathBuf),

    /// No constraint template ships for the configured device.
    #[error("no constraint template for part '{0}'")]
    UnsupportedPart(String),

    /// The ensemble failed validation.
    #[error(transparent)]
    Model(#[from] canopy_model::ModelError),

    /// Layout derivation or constraint filtering failed.
    #[error(transparent)]
    Layout(#[from] canopy_layout::LayoutError),

    /// A template failed to render or to be written out.
    #[error(transparent)]
    Render(#[from] canopy_render::RenderError),

    /// A filesystem operation failed.
    #[error("filesystem error: {0}")]
    Io(#[from] std::io::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_output_dir_exists() {
        let err = BackendError::OutputDirExists(PathBuf::from("prj_1"));
        assert_eq!(format!("{err}"), "output directory 'prj_1' already exists");
    }

    #[test]
    fn display_unsupported_part() {
        let err = BackendError::UnsupportedPart("xc7a35t".to_string());
        assert_eq!(format!("{err}"), "no constraint template for part 'xc7a35t'");
    }
}
