//! Canopy CLI: deploys decision-tree ensembles onto Xilinx FPGAs.
//!
//! Provides `canopy convert` to generate the HLS project from a converted
//! ensemble, `canopy predict` to run the HLS C simulation over a feature
//! matrix, and `canopy build` to drive the vendor synthesis flow (including
//! the partial-reconfiguration stages for PDR builds).

#![warn(missing_docs)]

mod build;
mod convert;
mod predict;

use std::process;

use clap::{Parser, Subcommand};

/// Canopy: decision-tree ensembles on reconfigurable hardware.
#[derive(Parser, Debug)]
#[command(name = "canopy", version, about = "Canopy FPGA deployment toolchain")]
pub struct Cli {
    /// Suppress all output except errors.
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// The subcommand to run.
    #[command(subcommand)]
    pub command: Command,
}

/// Available CLI commands.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Generate the HLS project directory from a converted ensemble.
    Convert(ConvertArgs),
    /// Run the HLS C simulation and print the predicted scores.
    Predict(PredictArgs),
    /// Run the vendor synthesis flow on a generated project.
    Build(BuildArgs),
}

/// Arguments for the `canopy convert` subcommand.
#[derive(Parser, Debug)]
pub struct ConvertArgs {
    /// Path to the converter-exported ensemble JSON.
    #[arg(short, long)]
    pub model: String,

    /// Path to the `canopy.toml` build configuration.
    #[arg(short, long, default_value = "canopy.toml")]
    pub config: String,
}

/// Arguments for the `canopy predict` subcommand.
#[derive(Parser, Debug)]
pub struct PredictArgs {
    /// Path to the `canopy.toml` build configuration.
    #[arg(short, long, default_value = "canopy.toml")]
    pub config: String,

    /// Comma-delimited feature matrix, one sample per line.
    pub features: String,

    /// Also print the raw per-tree scores.
    #[arg(long)]
    pub trees: bool,
}

/// Arguments for the `canopy build` subcommand.
#[derive(Parser, Debug)]
pub struct BuildArgs {
    /// Path to the `canopy.toml` build configuration.
    #[arg(short, long, default_value = "canopy.toml")]
    pub config: String,

    /// Recreate the HLS project from scratch.
    #[arg(long)]
    pub reset: bool,

    /// Run C simulation before synthesis.
    #[arg(long)]
    pub csim: bool,

    /// Skip C synthesis.
    #[arg(long)]
    pub no_synth: bool,

    /// Run RTL co-simulation.
    #[arg(long)]
    pub cosim: bool,

    /// Export the synthesized IP.
    #[arg(long)]
    pub export: bool,
}

fn main() {
    let cli = Cli::parse();

    let result = match cli.command {
        Command::Convert(ref args) => convert::run(args, cli.quiet),
        Command::Predict(ref args) => predict::run(args, cli.quiet),
        Command::Build(ref args) => build::run(args, cli.quiet),
    };

    match result {
        Ok(code) => process::exit(code),
        Err(e) => {
            eprintln!("error: {e}");
            process::exit(1);
        }
    }
}
