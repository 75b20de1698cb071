//! Error types for toolchain invocation.

use std::path::PathBuf;

use canopy_config::HlsTool;

/// The pipeline stage a subprocess failure occurred in.
///
/// Callers map stages to distinct process exit codes, so operators can tell
/// failure causes apart without reading logs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    /// HLS C simulation driven by `predict`.
    Predict,
    /// The main HLS synthesis run.
    HlsBuild,
    /// The tree-wrapper Vivado project build.
    TreeWrapper,
    /// The top-system block-design build.
    SystemBd,
    /// Static-shell synthesis.
    StaticShell,
    /// The reconfiguration synthesis driven by `design.tcl`.
    ReconfigSynth,
}

impl std::fmt::Display for Stage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Stage::Predict => "predict",
            Stage::HlsBuild => "build",
            Stage::TreeWrapper => "tree wrapper",
            Stage::SystemBd => "system block design",
            Stage::StaticShell => "static shell synthesis",
            Stage::ReconfigSynth => "reconfiguration synthesis",
        };
        f.write_str(name)
    }
}

/// Errors that can occur while resolving or running vendor tools.
#[derive(Debug, thiserror::Error)]
pub enum ToolError {
    /// No HLS executable was found on the search path.
    #[error("no HLS tool in PATH; did you source the Xilinx toolchain?")]
    NotFound,

    /// The resolved tool cannot run the partial-reconfiguration flow.
    #[error("partial reconfiguration requires Vitis HLS; '{tool}' is not supported", tool = .0.executable())]
    PdrUnsupported(HlsTool),

    /// A vendor subprocess exited non-zero.
    #[error("'{stage}' failed, check {log}", log = .log.display())]
    ExternalToolFailure {
        /// The stage the failing subprocess belonged to.
        stage: Stage,
        /// The log file the tool's output was redirected to.
        log: PathBuf,
    },

    /// An artifact a later stage depends on was never produced.
    #[error("expected artifact missing: {0}")]
    MissingArtifact(PathBuf),

    /// A simulation result log could not be parsed.
    #[error("malformed simulation results: {0}")]
    BadResults(String),

    /// A filesystem operation failed.
    #[error("filesystem error: {0}")]
    Io(#[from] std::io::Error),

    /// An IP export archive could not be read.
    #[error("failed to extract IP archive: {0}")]
    Zip(#[from] zip::result::ZipError),
}
