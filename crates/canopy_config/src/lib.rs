//! Parsing and validation of `canopy.toml` build configuration files.
//!
//! This crate reads the build configuration and produces a strongly-typed
//! [`BuildConfig`] naming the HLS project, the output directory, the numeric
//! precision, the target device, and the optional partial-reconfiguration
//! layout parameters.

#![warn(missing_docs)]

pub mod error;
pub mod loader;
pub mod types;

pub use error::ConfigError;
pub use loader::{load_config, load_config_from_str};
pub use types::{BuildConfig, HlsTool, PdrConfig};
