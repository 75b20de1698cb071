//! Top-level project writer: scaffolds the tree and renders every file.

use std::fs;
use std::path::Path;

use canopy_config::BuildConfig;
use canopy_layout::{filter_constraints, Layout};
use canopy_model::Ensemble;

use crate::error::BackendError;
use crate::firmware::write_firmware;
use crate::scaffold::{scaffold, system_dir};
use crate::scripts::{write_hls_scripts, write_reconfig_scripts, write_system_scripts};
use crate::assets;

/// Generates the complete HLS project for `ensemble` under the configured
/// output directory.
///
/// Idempotent function of its inputs and the filesystem; every build targets
/// a fresh output directory and a failed build leaves no half-rendered file
/// behind (each render is buffered before its single write).
pub fn write_project(ensemble: &Ensemble, config: &BuildConfig) -> Result<(), BackendError> {
    ensemble.validate()?;
    let layout = Layout::derive(ensemble, config)?;

    scaffold(config)?;
    let out_dir = Path::new(&config.output_dir);

    write_firmware(ensemble, config, &layout, out_dir)?;
    write_hls_scripts(ensemble, config, &layout, out_dir)?;

    if config.is_pdr() {
        write_system_scripts(ensemble, config, &layout, out_dir)?;

        let system = system_dir(config);
        write_reconfig_scripts(ensemble, config, &layout, &system)?;

        let template = assets::constraint_template(&config.xilinx_part)
            .ok_or_else(|| BackendError::UnsupportedPart(config.xilinx_part.clone()))?;
        let filtered = filter_constraints(template, layout.bank_count, layout.trees_per_bank)?;
        fs::write(system.join("constrs/top_system_pblock.xdc"), filtered)?;
    }
    Ok(())
}
