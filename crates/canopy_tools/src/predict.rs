//! The `predict` flow: HLS C simulation over a feature matrix.
//!
//! Input features are written to `tb_data/tb_input_features.dat` before the
//! tool runs; the generated testbench reads them back and leaves its scores
//! in `tb_data/csim_results.log` and the raw per-tree scores in
//! `tb_data/csim_tree_results.log`.

use std::fmt::Write as _;
use std::fs;
use std::path::Path;

use canopy_config::BuildConfig;

use crate::error::{Stage, ToolError};
use crate::invoke::run_hls;
use crate::resolve::{require_pdr_support, resolve_tool};

/// Scores read back from a C-simulation run.
#[derive(Debug, Clone, PartialEq)]
pub struct Prediction {
    /// Per-sample class scores.
    pub scores: Vec<Vec<f64>>,
    /// Per-sample raw tree scores, when the testbench emitted them.
    pub tree_scores: Option<Vec<Vec<f64>>>,
}

/// Writes the feature matrix as comma-delimited, width-10 floating point,
/// one sample per line.
pub fn write_input_features(out_dir: &Path, features: &[Vec<f64>]) -> Result<(), ToolError> {
    let mut text = String::new();
    for sample in features {
        let row: Vec<String> = sample.iter().map(|v| format!("{v:10.6}")).collect();
        let _ = writeln!(text, "{}", row.join(","));
    }
    fs::write(out_dir.join("tb_data/tb_input_features.dat"), text)?;
    Ok(())
}

/// Parses a whitespace-delimited numeric log into one row per line.
pub fn parse_results(path: &Path) -> Result<Vec<Vec<f64>>, ToolError> {
    let content = fs::read_to_string(path)
        .map_err(|_| ToolError::MissingArtifact(path.to_path_buf()))?;
    let mut rows = Vec::new();
    for (lineno, line) in content.lines().enumerate() {
        if line.trim().is_empty() {
            continue;
        }
        let row: Result<Vec<f64>, _> = line.split_whitespace().map(str::parse).collect();
        rows.push(row.map_err(|_| {
            ToolError::BadResults(format!("{}:{}: not a number", path.display(), lineno + 1))
        })?);
    }
    Ok(rows)
}

/// Runs the HLS C simulation over `features` and reads the scores back.
///
/// Mirrors the historical flow: plain builds run `csim=1 synth=0`; PDR
/// builds run the fast software model (`csim=0 fastsim=1 synth=0`) and
/// require Vitis HLS.
pub fn decision_function(
    config: &BuildConfig,
    features: &[Vec<f64>],
    with_tree_scores: bool,
) -> Result<Prediction, ToolError> {
    let out_dir = Path::new(&config.output_dir);
    write_input_features(out_dir, features)?;

    let tool = resolve_tool(config.tool)?;
    require_pdr_support(tool, config.is_pdr())?;

    let flags = if config.is_pdr() {
        "csim=0 fastsim=1 synth=0"
    } else {
        "csim=1 synth=0"
    };
    run_hls(tool, out_dir, flags, "predict.log", Stage::Predict)?;

    let scores = parse_results(&out_dir.join("tb_data/csim_results.log"))?;
    let tree_scores = if with_tree_scores {
        Some(parse_results(&out_dir.join("tb_data/csim_tree_results.log"))?)
    } else {
        None
    };
    Ok(Prediction { scores, tree_scores })
}
