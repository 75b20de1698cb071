//! Locating the vendor HLS executable on the search path.

use std::path::{Path, PathBuf};

use canopy_config::HlsTool;

use crate::error::ToolError;

/// Searches the `PATH` environment for an executable named `name`.
pub fn find_in_path(name: &str) -> Option<PathBuf> {
    let path = std::env::var_os("PATH")?;
    for dir in std::env::split_paths(&path) {
        let candidate = dir.join(name);
        if is_executable(&candidate) {
            return Some(candidate);
        }
    }
    None
}

#[cfg(unix)]
fn is_executable(path: &Path) -> bool {
    use std::os::unix::fs::PermissionsExt;
    path.metadata()
        .map(|m| m.is_file() && m.permissions().mode() & 0o111 != 0)
        .unwrap_or(false)
}

#[cfg(not(unix))]
fn is_executable(path: &Path) -> bool {
    path.is_file()
}

/// Resolves the HLS tool to use for this build.
///
/// An explicitly configured tool is looked up directly; otherwise the fixed
/// priority order of [`HlsTool::probe_order`] is probed. The resolution is
/// performed once per build and the result threaded down to every
/// invocation, never stashed in a global.
pub fn resolve_tool(configured: Option<HlsTool>) -> Result<HlsTool, ToolError> {
    match configured {
        Some(tool) => {
            if find_in_path(tool.executable()).is_some() {
                Ok(tool)
            } else {
                Err(ToolError::NotFound)
            }
        }
        None => HlsTool::probe_order()
            .iter()
            .copied()
            .find(|tool| find_in_path(tool.executable()).is_some())
            .ok_or(ToolError::NotFound),
    }
}

/// Checks that `tool` can run the PDR flow when one is requested.
pub fn require_pdr_support(tool: HlsTool, pdr: bool) -> Result<(), ToolError> {
    if pdr && !tool.supports_pdr() {
        return Err(ToolError::PdrUnsupported(tool));
    }
    Ok(())
}
