//! Project generation for the Xilinx HLS backend.
//!
//! Materializes a complete, self-contained HLS project directory from an
//! ensemble and a build configuration: synthesizable C++ firmware, the HLS
//! and Vivado build scripts, testbench scaffolding, and, for
//! partial-reconfiguration builds, the reconfigurable-system project tree
//! with its region-partition scripts and filtered device constraints.

#![warn(missing_docs)]

pub mod assets;
pub mod error;
pub mod firmware;
pub mod scaffold;
pub mod scripts;
pub mod writer;

pub use error::BackendError;
pub use scaffold::scaffold;
pub use writer::write_project;
