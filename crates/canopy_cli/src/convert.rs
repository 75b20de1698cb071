//! `canopy convert`: generate the HLS project directory.

use std::error::Error;
use std::path::Path;

use crate::ConvertArgs;

/// Runs the `canopy convert` command. Returns exit code 0 on success.
pub fn run(args: &ConvertArgs, quiet: bool) -> Result<i32, Box<dyn Error>> {
    let ensemble = canopy_model::load_ensemble(Path::new(&args.model))?;
    let config = canopy_config::load_config(Path::new(&args.config))?;

    canopy_backend::write_project(&ensemble, &config)?;

    if !quiet {
        eprintln!(
            "  Generated project `{}` in {}",
            config.project_name, config.output_dir
        );
        if config.is_pdr() {
            eprintln!(
                "     Reconfigurable system under {}_reconfigurable_system/",
                config.project_name
            );
        }
    }
    Ok(0)
}
