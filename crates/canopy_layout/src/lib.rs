//! Layout derivation for the generated HLS project.
//!
//! Turns the ensemble structure and the build configuration into the scalar
//! quantities every code-generation step consumes: tree and class counts,
//! bank geometry, the number of reconfiguration variants, and the bitwidths
//! of the systolic-array interconnect. Also owns the region-partition
//! assignment for partial-reconfiguration builds and the constraint-template
//! filter. Everything here is pure arithmetic over small fixed-size loops.

#![warn(missing_docs)]

pub mod constraints;
pub mod derive;
pub mod error;
pub mod pdr;

pub use constraints::filter_constraints;
pub use derive::{Layout, MAX_PARALLEL_SAMPLES};
pub use error::LayoutError;
pub use pdr::{assign_modules, PartitionAssignment, RmVariant};
