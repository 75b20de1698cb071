//! Output directory scaffolding and static support files.

use std::fs;
use std::path::{Path, PathBuf};

use canopy_config::BuildConfig;

use crate::assets;
use crate::error::BackendError;

/// The root of the reconfigurable-system tree for a project.
pub fn system_dir(config: &BuildConfig) -> PathBuf {
    Path::new(&config.output_dir).join(format!("{}_reconfigurable_system", config.project_name))
}

/// Creates the output directory tree and copies the static support files.
///
/// Fails with [`BackendError::OutputDirExists`] when the output directory is
/// already present; a build never merges into or overwrites an earlier one.
pub fn scaffold(config: &BuildConfig) -> Result<(), BackendError> {
    let out_dir = Path::new(&config.output_dir);
    if out_dir.exists() {
        return Err(BackendError::OutputDirExists(out_dir.to_path_buf()));
    }

    fs::create_dir_all(out_dir.join("firmware"))?;
    fs::create_dir_all(out_dir.join("tb_data"))?;
    fs::write(out_dir.join("firmware/BDT.h"), assets::BDT_H)?;
    fs::write(out_dir.join("firmware/utils.h"), assets::UTILS_H)?;

    if config.is_pdr() {
        let system = system_dir(config);
        for sub in [
            "srcs/dcp",
            "srcs/hdl",
            "srcs/ip",
            "srcs/prj",
            "constrs",
            "scripts/tcl",
        ] {
            fs::create_dir_all(system.join(sub))?;
        }
        for (name, content) in assets::SYSTEM_TCL_HELPERS {
            fs::write(system.join("scripts/tcl").join(name), content)?;
        }
        fs::create_dir_all(out_dir.join("build_pdr_ips"))?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config_in(dir: &Path, pdr: bool) -> BuildConfig {
        let pdr_section = if pdr {
            "xilinx_board = \"b\"\n[pdr]\nbanks = 2\ntrees_per_bank = 2\ntrees_per_class = 2\n"
        } else {
            ""
        };
        let toml = format!(
            r#"
project_name = "iris"
output_dir = "{}"
precision = "ap_fixed<18,8>"
xilinx_part = "xczu9eg-ffvb1156-2-e"
clock_period = 5
{pdr_section}"#,
            dir.join("prj").display()
        );
        canopy_config::load_config_from_str(&toml).unwrap()
    }

    #[test]
    fn creates_plain_tree() {
        let dir = tempfile::tempdir().unwrap();
        let config = config_in(dir.path(), false);
        scaffold(&config).unwrap();

        let out = Path::new(&config.output_dir);
        assert!(out.join("firmware/BDT.h").exists());
        assert!(out.join("firmware/utils.h").exists());
        assert!(out.join("tb_data").is_dir());
        assert!(!system_dir(&config).exists());
    }

    #[test]
    fn creates_reconfigurable_system_tree() {
        let dir = tempfile::tempdir().unwrap();
        let config = config_in(dir.path(), true);
        scaffold(&config).unwrap();

        let system = system_dir(&config);
        for sub in ["srcs/dcp", "srcs/hdl", "srcs/ip", "srcs/prj", "constrs"] {
            assert!(system.join(sub).is_dir(), "missing {sub}");
        }
        assert!(system.join("scripts/tcl/pr_utils.tcl").exists());
        assert!(system.join("scripts/tcl/run.tcl").exists());
        assert!(Path::new(&config.output_dir).join("build_pdr_ips").is_dir());
    }

    #[test]
    fn refuses_existing_output_dir() {
        let dir = tempfile::tempdir().unwrap();
        let config = config_in(dir.path(), false);
        fs::create_dir_all(&config.output_dir).unwrap();
        fs::write(Path::new(&config.output_dir).join("keep.txt"), "prior build").unwrap();

        let err = scaffold(&config).unwrap_err();
        assert!(matches!(err, BackendError::OutputDirExists(_)));
        // The earlier build's artifacts are untouched.
        assert!(Path::new(&config.output_dir).join("keep.txt").exists());
        assert!(!Path::new(&config.output_dir).join("firmware").exists());
    }
}
