//! `canopy build`: the vendor synthesis flow.
//!
//! Non-PDR builds run the single HLS synthesis. PDR builds continue through
//! the Vivado stages: tree-wrapper project, top-system block design,
//! black-boxing of the tree netlists, static-shell synthesis, gathering of
//! the reconfiguration sources, and finally the `design.tcl` flow. Each
//! stage maps to its own exit code so operators can tell failures apart.

use std::error::Error;
use std::fs;
use std::path::{Path, PathBuf};

use canopy_backend::scaffold::system_dir;
use canopy_config::BuildConfig;
use canopy_tools::{BuildOptions, Stage, ToolError};

use crate::BuildArgs;

/// Exit code when no HLS tool is on the search path.
const EXIT_NO_TOOL: i32 = -4;
/// Exit code when the resolved tool cannot run the PDR flow.
const EXIT_PDR_UNSUPPORTED: i32 = -5;

fn exit_code(err: &ToolError) -> i32 {
    match err {
        ToolError::NotFound => EXIT_NO_TOOL,
        ToolError::PdrUnsupported(_) => EXIT_PDR_UNSUPPORTED,
        ToolError::ExternalToolFailure { stage, .. } => match stage {
            Stage::Predict => -3,
            Stage::HlsBuild => -6,
            Stage::TreeWrapper => -7,
            Stage::SystemBd => -8,
            Stage::StaticShell => -9,
            Stage::ReconfigSynth => -10,
        },
        _ => -6,
    }
}

fn pipeline(config: &BuildConfig, opts: BuildOptions, quiet: bool) -> Result<(), ToolError> {
    let out_dir = fs::canonicalize(&config.output_dir)?;

    let tool = canopy_tools::resolve_tool(config.tool)?;
    canopy_tools::require_pdr_support(tool, config.is_pdr())?;

    if !quiet {
        eprintln!("  Running {} on {}", tool.executable(), out_dir.display());
    }
    canopy_tools::run_hls(tool, &out_dir, &opts.to_string(), "build.log", Stage::HlsBuild)?;

    if !config.is_pdr() {
        return Ok(());
    }

    let project = &config.project_name;
    let hls_prj: PathBuf = out_dir.join(format!("{project}_prj"));
    let system: PathBuf = out_dir.join(format!("{project}_system"));
    let recon: PathBuf = fs::canonicalize(system_dir(config))?;

    canopy_tools::run_vivado(
        &out_dir,
        "build_tree_wrapper.tcl",
        &[
            format!("{project}_tree_wrapper"),
            out_dir.join(format!("{project}_tree_wrapper")).display().to_string(),
            hls_prj.display().to_string(),
        ],
        "vivado_tree_wrapper.log",
        Stage::TreeWrapper,
    )?;

    canopy_tools::run_vivado(
        &out_dir,
        "build_system_bd.tcl",
        &[
            format!("{project}_system"),
            system.display().to_string(),
            hls_prj.display().to_string(),
        ],
        "vivado_system_bd.log",
        Stage::SystemBd,
    )?;

    let rewritten = canopy_tools::blackbox_netlists(&system, &recon.join("srcs/hdl"))?;
    if !quiet {
        eprintln!("  Black-boxed {} tree netlists", rewritten.len());
    }

    canopy_tools::run_vivado(
        &out_dir,
        "synth_static_shell.tcl",
        &[system.display().to_string()],
        "vivado_static_shell.log",
        Stage::StaticShell,
    )?;

    canopy_tools::gather_static_shell(&system, &recon)?;
    let ips = canopy_tools::extract_ip_archives(&hls_prj, &recon)?;
    if !quiet {
        eprintln!("  Extracted {} tree IP exports", ips.len());
    }
    canopy_tools::generate_prj_lists(&recon)?;

    canopy_tools::run_vivado(
        &recon,
        "scripts/design.tcl",
        &[],
        "vivado_reconfig.log",
        Stage::ReconfigSynth,
    )?;
    Ok(())
}

/// Runs the `canopy build` command.
pub fn run(args: &BuildArgs, quiet: bool) -> Result<i32, Box<dyn Error>> {
    let config = canopy_config::load_config(Path::new(&args.config))?;
    let opts = BuildOptions {
        reset: args.reset,
        csim: args.csim,
        synth: !args.no_synth,
        cosim: args.cosim,
        export: args.export,
    };

    match pipeline(&config, opts, quiet) {
        Ok(()) => {
            if !quiet {
                eprintln!("  Build of `{}` complete", config.project_name);
            }
            Ok(0)
        }
        Err(err) => {
            eprintln!("error: {err}");
            Ok(exit_code(&err))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exit_codes_are_distinct_per_stage() {
        let codes: Vec<i32> = [
            Stage::HlsBuild,
            Stage::TreeWrapper,
            Stage::SystemBd,
            Stage::StaticShell,
            Stage::ReconfigSynth,
        ]
        .iter()
        .map(|stage| {
            exit_code(&ToolError::ExternalToolFailure {
                stage: *stage,
                log: PathBuf::from("x.log"),
            })
        })
        .collect();
        assert_eq!(codes, [-6, -7, -8, -9, -10]);

        assert_eq!(exit_code(&ToolError::NotFound), EXIT_NO_TOOL);
        assert_eq!(
            exit_code(&ToolError::PdrUnsupported(canopy_config::HlsTool::VivadoHls)),
            EXIT_PDR_UNSUPPORTED
        );
    }
}
