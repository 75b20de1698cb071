//! Error types for layout derivation and constraint filtering.

/// Errors that can occur while deriving the project layout or filtering
/// constraint templates.
#[derive(Debug, thiserror::Error)]
pub enum LayoutError {
    /// A required configuration value is missing for the requested layout.
    #[error("layout configuration error: {0}")]
    Configuration(String),

    /// A derived quantity would be computed from a non-positive argument.
    #[error("invalid layout arithmetic: {0}")]
    InvalidArithmetic(String),

    /// A constraint template marker line could not be parsed.
    #[error("malformed constraint marker: '{0}'")]
    MalformedMarker(String),

    /// The constraint template carries no marker lines at all.
    #[error("constraint template has no bank markers")]
    MissingMarkers,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_configuration() {
        let err = LayoutError::Configuration("pdr missing".to_string());
        assert_eq!(format!("{err}"), "layout configuration error: pdr missing");
    }

    #[test]
    fn display_marker() {
        let err = LayoutError::MalformedMarker("begin bank x".to_string());
        assert_eq!(
            format!("{err}"),
            "malformed constraint marker: 'begin bank x'"
        );
    }
}
