//! `canopy predict`: HLS C simulation over a feature matrix.

use std::error::Error;
use std::fs;
use std::path::Path;

use canopy_tools::ToolError;

use crate::PredictArgs;

/// Exit code when no HLS tool is on the search path.
const EXIT_NO_TOOL: i32 = -1;
/// Exit code when the resolved tool cannot run a PDR simulation.
const EXIT_PDR_UNSUPPORTED: i32 = -2;
/// Exit code when the C simulation itself fails.
const EXIT_SIM_FAILED: i32 = -3;

/// Parses a comma-delimited feature matrix, one sample per line.
fn parse_features(content: &str) -> Result<Vec<Vec<f64>>, Box<dyn Error>> {
    let mut rows = Vec::new();
    for (lineno, line) in content.lines().enumerate() {
        if line.trim().is_empty() {
            continue;
        }
        let row: Result<Vec<f64>, _> = line.split(',').map(|v| v.trim().parse()).collect();
        rows.push(row.map_err(|e| format!("line {}: {e}", lineno + 1))?);
    }
    Ok(rows)
}

/// Runs the `canopy predict` command.
pub fn run(args: &PredictArgs, quiet: bool) -> Result<i32, Box<dyn Error>> {
    let config = canopy_config::load_config(Path::new(&args.config))?;
    let features = parse_features(&fs::read_to_string(&args.features)?)?;

    let prediction = match canopy_tools::decision_function(&config, &features, args.trees) {
        Ok(p) => p,
        Err(err) => {
            eprintln!("error: {err}");
            return Ok(match err {
                ToolError::NotFound => EXIT_NO_TOOL,
                ToolError::PdrUnsupported(_) => EXIT_PDR_UNSUPPORTED,
                _ => EXIT_SIM_FAILED,
            });
        }
    };

    for row in &prediction.scores {
        let line: Vec<String> = row.iter().map(f64::to_string).collect();
        println!("{}", line.join(" "));
    }
    if let Some(tree_scores) = &prediction.tree_scores {
        for row in tree_scores {
            let line: Vec<String> = row.iter().map(f64::to_string).collect();
            println!("{}", line.join(" "));
        }
    }
    if !quiet {
        eprintln!("  Simulated {} samples", prediction.scores.len());
    }
    Ok(0)
}
