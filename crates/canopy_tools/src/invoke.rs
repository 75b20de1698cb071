//! Blocking invocation of the vendor batch tools.

use std::fmt;
use std::fs::File;
use std::path::{Path, PathBuf};
use std::process::Command;

use canopy_config::HlsTool;

use crate::error::{Stage, ToolError};

/// Run-mode flags passed to `build_prj.tcl`.
///
/// Rendered as the single space-separated `key=value` argument the script
/// expects, e.g. `"reset=0 csim=0 synth=1 cosim=0 export=0"`.
#[derive(Debug, Clone, Copy)]
pub struct BuildOptions {
    /// Recreate the HLS project from scratch.
    pub reset: bool,
    /// Run C simulation.
    pub csim: bool,
    /// Run C synthesis.
    pub synth: bool,
    /// Run RTL co-simulation.
    pub cosim: bool,
    /// Export the synthesized IP.
    pub export: bool,
}

impl Default for BuildOptions {
    fn default() -> Self {
        BuildOptions {
            reset: false,
            csim: false,
            synth: true,
            cosim: false,
            export: false,
        }
    }
}

impl fmt::Display for BuildOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "reset={} csim={} synth={} cosim={} export={}",
            self.reset as u8, self.csim as u8, self.synth as u8, self.cosim as u8,
            self.export as u8
        )
    }
}

fn open_log(work_dir: &Path, name: &str) -> Result<(File, PathBuf), ToolError> {
    let log = work_dir.join(name);
    let file = File::create(&log)?;
    Ok((file, log))
}

/// Runs `<hls> -f build_prj.tcl "<flags>"` in `work_dir`, redirecting output
/// to `log_name`.
///
/// Blocks for the tool's full run time; EDA runs are not retryable, so a
/// non-zero exit surfaces the log path and aborts the build.
pub fn run_hls(
    tool: HlsTool,
    work_dir: &Path,
    flags: &str,
    log_name: &str,
    stage: Stage,
) -> Result<(), ToolError> {
    let (log_file, log) = open_log(work_dir, log_name)?;
    let status = Command::new(tool.executable())
        .current_dir(work_dir)
        .arg("-f")
        .arg("build_prj.tcl")
        .arg(flags)
        .stdout(log_file)
        .status()?;
    if !status.success() {
        return Err(ToolError::ExternalToolFailure { stage, log });
    }
    Ok(())
}

/// Runs `vivado -nojournal -nolog -mode batch -source <script> -tclargs ...`
/// in `work_dir`, redirecting output to `log_name`.
pub fn run_vivado(
    work_dir: &Path,
    script: &str,
    tclargs: &[String],
    log_name: &str,
    stage: Stage,
) -> Result<(), ToolError> {
    let (log_file, log) = open_log(work_dir, log_name)?;
    let mut cmd = Command::new("vivado");
    cmd.current_dir(work_dir)
        .args(["-nojournal", "-nolog", "-mode", "batch", "-source", script])
        .stdout(log_file);
    if !tclargs.is_empty() {
        cmd.arg("-tclargs").args(tclargs);
    }
    let status = cmd.status()?;
    if !status.success() {
        return Err(ToolError::ExternalToolFailure { stage, log });
    }
    Ok(())
}
