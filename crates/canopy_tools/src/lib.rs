//! Vendor toolchain invocation and post-synthesis housekeeping.
//!
//! Resolves the Xilinx HLS executable on the search path, drives the HLS and
//! Vivado batch runs of a build, and prepares the artifacts the
//! partial-reconfiguration flow consumes: black-boxed tree netlists, the
//! static-shell checkpoint, extracted IP exports and their `.prj` file
//! lists. Every subprocess blocks until completion, its output redirected to
//! a named log file; a non-zero exit aborts the whole pipeline, nothing is
//! retried.

#![warn(missing_docs)]

pub mod error;
pub mod invoke;
pub mod pdr_prep;
pub mod predict;
pub mod resolve;

pub use error::{Stage, ToolError};
pub use invoke::{run_hls, run_vivado, BuildOptions};
pub use pdr_prep::{
    blackbox_netlists, extract_ip_archives, gather_static_shell, generate_prj_lists,
};
pub use predict::{decision_function, parse_results, write_input_features, Prediction};
pub use resolve::{find_in_path, require_pdr_support, resolve_tool};
