//! JSON loading for converter-exported ensembles.

use std::path::Path;

use crate::ensemble::Ensemble;
use crate::error::ModelError;

/// Loads and validates an ensemble from a JSON file.
pub fn load_ensemble(path: &Path) -> Result<Ensemble, ModelError> {
    let content = std::fs::read_to_string(path)?;
    load_ensemble_from_str(&content)
}

/// Parses and validates an ensemble from a JSON string.
///
/// Useful for testing without filesystem dependencies.
pub fn load_ensemble_from_str(content: &str) -> Result<Ensemble, ModelError> {
    let ensemble: Ensemble =
        serde_json::from_str(content).map_err(|e| ModelError::ParseError(e.to_string()))?;
    ensemble.validate()?;
    Ok(ensemble)
}
