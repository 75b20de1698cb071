//! In-memory representation of a trained decision-tree ensemble.
//!
//! The ensemble is produced by an upstream model converter (scikit-learn,
//! ONNX, ...) and handed to Canopy as JSON. This crate defines the typed
//! structure, the JSON loader, and structural validation. The ensemble is
//! read-only input to every later pipeline stage.

#![warn(missing_docs)]

pub mod ensemble;
pub mod error;
pub mod load;

pub use ensemble::{Ensemble, Tree};
pub use error::ModelError;
pub use load::{load_ensemble, load_ensemble_from_str};
