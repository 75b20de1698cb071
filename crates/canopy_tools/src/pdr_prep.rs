//! Post-synthesis preparation of the reconfigurable-system sources.
//!
//! After Vivado synthesizes the system project, the per-tree netlists are
//! rewritten for black-box synthesis, the static-shell checkpoint and the
//! exported tree IPs are gathered into the reconfigurable-system tree, and
//! one `.prj` file list is generated per IP for the out-of-context module
//! synthesis in `design.tcl`.

use std::fs;
use std::path::{Path, PathBuf};

use crate::error::ToolError;

/// Recursively collects files under `dir` whose name matches `pred`.
fn walk_files(dir: &Path, pred: &dyn Fn(&str) -> bool, out: &mut Vec<PathBuf>) -> std::io::Result<()> {
    if !dir.is_dir() {
        return Ok(());
    }
    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        let path = entry.path();
        if path.is_dir() {
            walk_files(&path, pred, out)?;
        } else if let Some(name) = path.file_name().and_then(|n| n.to_str()) {
            if pred(name) {
                out.push(path);
            }
        }
    }
    Ok(())
}

fn dir_name_n_up(path: &Path, n: usize) -> Option<String> {
    let mut current = path;
    for _ in 0..n {
        current = current.parent()?;
    }
    current.file_name()?.to_str().map(str::to_string)
}

/// Rewrites every synthesized `tree_wrapper_tree_*.v` netlist under
/// `system_dir` for black-box synthesis.
///
/// Each netlist is copied into `hdl_dir` under a globally unique name (its
/// run directory four levels up qualifies the local instance name), with
/// the local module name replaced throughout and any pre-existing black-box
/// attributes dropped. The original file is then rewritten in place with
/// `(* black_box="true" *)` tagged onto its tree module declarations, so
/// the static shell synthesizes against opaque stubs. Returns the global
/// names, sorted.
pub fn blackbox_netlists(system_dir: &Path, hdl_dir: &Path) -> Result<Vec<String>, ToolError> {
    let mut netlists = Vec::new();
    walk_files(
        system_dir,
        &|name| name.starts_with("tree_wrapper_tree_") && name.ends_with(".v"),
        &mut netlists,
    )?;
    netlists.sort();

    let mut globals = Vec::new();
    for file in &netlists {
        let local_name = match dir_name_n_up(file, 2) {
            Some(n) => n,
            None => continue,
        };
        let global_name = match dir_name_n_up(file, 4) {
            Some(prefix) => format!("{prefix}_{local_name}"),
            None => continue,
        };

        let original = fs::read_to_string(file)?;
        let mut renamed = String::with_capacity(original.len());
        for line in original.lines() {
            if line.contains("(* black_box=\"true\" *)") {
                continue;
            }
            renamed.push_str(&line.replace(&local_name, &global_name));
            renamed.push('\n');
        }
        fs::write(hdl_dir.join(format!("{global_name}.v")), renamed)?;

        let backup = file.with_extension("v.bak");
        fs::rename(file, &backup)?;
        let mut stubbed = String::with_capacity(original.len());
        for line in original.lines() {
            if line.starts_with("module tree_") {
                stubbed.push_str("(* black_box=\"true\" *)\n");
            }
            stubbed.push_str(line);
            stubbed.push('\n');
        }
        fs::write(file, stubbed)?;

        globals.push(global_name);
    }
    Ok(globals)
}

/// Copies the static-shell checkpoint into the reconfigurable-system tree.
pub fn gather_static_shell(system_dir: &Path, recon_dir: &Path) -> Result<(), ToolError> {
    let dcp = system_dir.join("static_shell.dcp");
    if !dcp.exists() {
        return Err(ToolError::MissingArtifact(dcp));
    }
    fs::copy(&dcp, recon_dir.join("srcs/dcp/static_shell.dcp"))?;
    Ok(())
}

/// Extracts every `tree_*/impl/export.zip` IP archive from the HLS project
/// directory into `srcs/ip/<ip_name>/`. A tree project without its export
/// archive is a fatal missing artifact.
pub fn extract_ip_archives(hls_prj_dir: &Path, recon_dir: &Path) -> Result<Vec<String>, ToolError> {
    let mut names = Vec::new();
    for entry in fs::read_dir(hls_prj_dir)? {
        let entry = entry?;
        let name = entry.file_name().to_string_lossy().into_owned();
        if !entry.path().is_dir() || !name.starts_with("tree_") {
            continue;
        }
        let archive = entry.path().join("impl/export.zip");
        if !archive.exists() {
            return Err(ToolError::MissingArtifact(archive));
        }
        let file = fs::File::open(&archive)?;
        let mut zip = zip::ZipArchive::new(file)?;
        zip.extract(recon_dir.join("srcs/ip").join(&name))?;
        names.push(name);
    }
    names.sort();
    Ok(names)
}

fn verilog_files(dir: &Path) -> Result<Vec<PathBuf>, ToolError> {
    let mut files = Vec::new();
    if dir.is_dir() {
        for entry in fs::read_dir(dir)? {
            let path = entry?.path();
            if path.extension().is_some_and(|e| e == "v") {
                files.push(path);
            }
        }
    }
    files.sort();
    Ok(files)
}

/// Writes one `srcs/prj/<ip>.prj` file list per extracted tree IP, naming
/// the IP's Verilog sources plus the shared wrapper HDL, one
/// `verilog xil_defaultLib <path>` line each. Paths are relative to
/// `recon_dir`, where `design.tcl` runs.
pub fn generate_prj_lists(recon_dir: &Path) -> Result<(), ToolError> {
    let wrappers = verilog_files(&recon_dir.join("srcs/hdl"))?;

    let ip_root = recon_dir.join("srcs/ip");
    if !ip_root.is_dir() {
        return Ok(());
    }
    let mut ip_dirs: Vec<PathBuf> = fs::read_dir(&ip_root)?
        .filter_map(|e| e.ok().map(|e| e.path()))
        .filter(|p| {
            p.is_dir()
                && p.file_name()
                    .and_then(|n| n.to_str())
                    .is_some_and(|n| n.starts_with("tree_"))
        })
        .collect();
    ip_dirs.sort();

    for ip_dir in ip_dirs {
        let ip_name = ip_dir
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or_default()
            .to_string();
        let sources = verilog_files(&ip_dir.join("hdl/verilog"))?;

        let mut prj = String::new();
        for path in sources.iter().chain(wrappers.iter()) {
            let rel = path.strip_prefix(recon_dir).unwrap_or(path);
            prj.push_str(&format!("verilog xil_defaultLib {}\n", rel.display()));
        }
        fs::write(recon_dir.join("srcs/prj").join(format!("{ip_name}.prj")), prj)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn touch(path: &Path, content: &str) {
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, content).unwrap();
    }

    #[test]
    fn blackbox_rewrites_and_renames() {
        let dir = tempfile::tempdir().unwrap();
        let system = dir.path().join("iris_system");
        let hdl = dir.path().join("hdl");
        fs::create_dir_all(&hdl).unwrap();

        let netlist = system
            .join("iris.runs/tree_rp_0_0_synth_1/bd/tree_wrapper_tree_0/synth/tree_wrapper_tree_0.v");
        touch(
            &netlist,
            "module tree_wrapper_tree_0 (input clk);\nendmodule\n",
        );

        let globals = blackbox_netlists(&system, &hdl).unwrap();
        assert_eq!(globals, ["tree_rp_0_0_synth_1_tree_wrapper_tree_0"]);

        // The copy is renamed throughout and lives under the global name.
        let copied = fs::read_to_string(
            hdl.join("tree_rp_0_0_synth_1_tree_wrapper_tree_0.v"),
        )
        .unwrap();
        assert!(copied.contains("module tree_rp_0_0_synth_1_tree_wrapper_tree_0"));
        assert!(!copied.contains("module tree_wrapper_tree_0 "));

        // The original is stubbed as a black box, with a backup kept.
        let stubbed = fs::read_to_string(&netlist).unwrap();
        assert!(stubbed.starts_with("(* black_box=\"true\" *)\nmodule tree_wrapper_tree_0"));
        assert!(netlist.with_extension("v.bak").exists());
    }

    #[test]
    fn gather_static_shell_requires_checkpoint() {
        let dir = tempfile::tempdir().unwrap();
        let system = dir.path().join("sys");
        let recon = dir.path().join("recon");
        fs::create_dir_all(&system).unwrap();
        fs::create_dir_all(recon.join("srcs/dcp")).unwrap();

        assert!(matches!(
            gather_static_shell(&system, &recon),
            Err(ToolError::MissingArtifact(_))
        ));

        touch(&system.join("static_shell.dcp"), "checkpoint");
        gather_static_shell(&system, &recon).unwrap();
        assert!(recon.join("srcs/dcp/static_shell.dcp").exists());
    }

    #[test]
    fn missing_export_archive_is_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let hls = dir.path().join("iris_prj");
        let recon = dir.path().join("recon");
        fs::create_dir_all(hls.join("tree_cl0_0/impl")).unwrap();
        fs::create_dir_all(recon.join("srcs/ip")).unwrap();

        assert!(matches!(
            extract_ip_archives(&hls, &recon),
            Err(ToolError::MissingArtifact(_))
        ));
    }

    #[test]
    fn prj_lists_name_ip_and_wrapper_sources() {
        let dir = tempfile::tempdir().unwrap();
        let recon = dir.path().join("recon");
        touch(&recon.join("srcs/hdl/wrapper_a.v"), "");
        touch(&recon.join("srcs/hdl/wrapper_b.v"), "");
        touch(&recon.join("srcs/ip/tree_cl0_0/hdl/verilog/tree.v"), "");
        fs::create_dir_all(recon.join("srcs/prj")).unwrap();

        generate_prj_lists(&recon).unwrap();

        let prj = fs::read_to_string(recon.join("srcs/prj/tree_cl0_0.prj")).unwrap();
        assert_eq!(
            prj,
            "verilog xil_defaultLib srcs/ip/tree_cl0_0/hdl/verilog/tree.v\n\
             verilog xil_defaultLib srcs/hdl/wrapper_a.v\n\
             verilog xil_defaultLib srcs/hdl/wrapper_b.v\n"
        );
    }
}
