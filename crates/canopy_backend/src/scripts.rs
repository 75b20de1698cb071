//! Generation of the HLS and Vivado build scripts.

use std::path::Path;

use canopy_config::BuildConfig;
use canopy_layout::{assign_modules, Layout, PartitionAssignment, MAX_PARALLEL_SAMPLES};
use canopy_model::Ensemble;
use canopy_render::{render_to_file, Bindings};

use crate::assets;
use crate::error::BackendError;

/// Names of every HLS IP of a PDR build, in script order: bank buffers,
/// trees in ensemble order, voting stations, then the fixed support IPs.
pub fn pdr_ip_names(ensemble: &Ensemble, layout: &Layout) -> Vec<String> {
    let mut ips = Vec::new();
    for bank in 1..=layout.bank_count {
        ips.push(format!("bank_buffer_{bank}"));
    }
    for (class, trees) in ensemble.trees.iter().enumerate() {
        for round in 0..trees.len() {
            ips.push(format!("tree_cl{class}_{round}"));
        }
    }
    for class in 0..ensemble.trees.len() {
        ips.push(format!("voting_station_cl{class}"));
    }
    ips.push("tree_idle".to_string());
    ips.push("vote_buffer".to_string());
    ips.push("enumerator".to_string());
    ips
}

/// Writes `build_prj.tcl` (and, for PDR, one script per IP under
/// `build_pdr_ips/`).
pub fn write_hls_scripts(
    ensemble: &Ensemble,
    config: &BuildConfig,
    layout: &Layout,
    out_dir: &Path,
) -> Result<(), BackendError> {
    let common = Bindings::new()
        .set("project", &config.project_name)
        .set("part", &config.xilinx_part)
        .set("clock_period", config.clock_period);

    if !config.is_pdr() {
        render_to_file(assets::BUILD_PRJ_TCL, &common, &out_dir.join("build_prj.tcl"))?;
        return Ok(());
    }

    let ips = pdr_ip_names(ensemble, layout);
    let sources: String = ips
        .iter()
        .map(|ip| format!("    source build_pdr_ips/{ip}.tcl\n"))
        .collect();
    let bindings = common.clone().set("ip_script_sources", sources);
    render_to_file(assets::BUILD_PDR_PRJ_TCL, &bindings, &out_dir.join("build_prj.tcl"))?;

    for ip in &ips {
        let bindings = common.clone().set("ip", ip);
        render_to_file(
            assets::BUILD_PDR_IP_TCL,
            &bindings,
            &out_dir.join("build_pdr_ips").join(format!("{ip}.tcl")),
        )?;
    }
    Ok(())
}

/// Bindings shared by every Vivado system script.
fn system_bindings(config: &BuildConfig, layout: &Layout) -> Bindings {
    let board = config.xilinx_board.as_deref().unwrap_or_default();
    Bindings::new()
        .set("project", &config.project_name)
        .set("part", &config.xilinx_part)
        .set("board", board)
        .set("bank_count", layout.bank_count)
        .set("trees_per_bank", layout.trees_per_bank)
        .set("class_count", layout.class_count)
        .set("rp_variants", layout.rp_variants)
        .set("max_parallel_samples", MAX_PARALLEL_SAMPLES)
        .set("port_width", layout.port_width)
        .set("data_width", layout.data_width)
        .set("stream_width", layout.stream_width)
        .set("sample_index_width", layout.sample_index_width)
}

fn bank_cells(layout: &Layout) -> String {
    (1..=layout.bank_count)
        .map(|b| {
            format!(
                "create_bd_cell -type ip -vlnv xilinx.com:hls:bank_buffer_{b}:1.0 bank_buffer_{b}\n"
            )
        })
        .collect()
}

fn tree_cells(partitions: &[PartitionAssignment]) -> String {
    partitions
        .iter()
        .map(|p| {
            // Every partition starts life as the idle tree; the PR flow
            // swaps the real variants in.
            format!(
                "create_bd_cell -type ip -vlnv xilinx.com:hls:tree_idle:1.0 {}\n",
                p.partition_name()
            )
        })
        .collect()
}

fn voting_cells(ensemble: &Ensemble) -> String {
    (0..ensemble.trees.len())
        .map(|c| {
            format!(
                "create_bd_cell -type ip -vlnv xilinx.com:hls:voting_station_cl{c}:1.0 \
                 voting_station_cl{c}\n"
            )
        })
        .collect()
}

fn stream_connections(ensemble: &Ensemble, partitions: &[PartitionAssignment]) -> String {
    let mut out = String::new();
    for p in partitions {
        let bank = p.bank + 1;
        let cell = p.partition_name();
        out.push_str(&format!(
            "connect_bd_intf_net [get_bd_intf_pins bank_buffer_{bank}/x_out] \
             [get_bd_intf_pins {cell}/x_in]\n"
        ));
    }
    for p in partitions {
        // Scores fan in class by class; the voting station of the first
        // scheduled variant owns the partition's score stream.
        if let Some(first) = p.variants.first() {
            out.push_str(&format!(
                "connect_bd_intf_net [get_bd_intf_pins {}/score_out] \
                 [get_bd_intf_pins voting_station_cl{}/score_in]\n",
                p.partition_name(),
                first.class
            ));
        }
    }
    for class in 0..ensemble.trees.len() {
        out.push_str(&format!(
            "connect_bd_intf_net [get_bd_intf_pins voting_station_cl{class}/score_out] \
             [get_bd_intf_pins vote_buffer/score_in]\n"
        ));
    }
    out
}

/// Writes `build_tree_wrapper.tcl`, `build_system_bd.tcl` and
/// `synth_static_shell.tcl` under `out_dir`.
pub fn write_system_scripts(
    ensemble: &Ensemble,
    config: &BuildConfig,
    layout: &Layout,
    out_dir: &Path,
) -> Result<(), BackendError> {
    let pdr = config.pdr().map_err(|e| {
        canopy_layout::LayoutError::Configuration(e.to_string())
    })?;
    let partitions = assign_modules(
        ensemble.trees.len(),
        pdr.trees_per_class,
        pdr.banks,
        pdr.trees_per_bank,
    );

    let wrapper = system_bindings(config, layout);
    render_to_file(
        assets::TREE_WRAPPER_TCL,
        &wrapper,
        &out_dir.join("build_tree_wrapper.tcl"),
    )?;

    let freq_hz = 1_000_000_000u64 / u64::from(config.clock_period);
    let system = system_bindings(config, layout)
        .set("freq_hz", freq_hz)
        .set("bank_cells", bank_cells(layout))
        .set("tree_cells", tree_cells(&partitions))
        .set("voting_cells", voting_cells(ensemble))
        .set("stream_connections", stream_connections(ensemble, &partitions));
    render_to_file(assets::TOP_SYSTEM_TCL, &system, &out_dir.join("build_system_bd.tcl"))?;

    let shell = system_bindings(config, layout);
    render_to_file(
        assets::STATIC_SHELL_TCL,
        &shell,
        &out_dir.join("synth_static_shell.tcl"),
    )?;
    Ok(())
}

fn rm_module_definitions(partitions: &[PartitionAssignment]) -> String {
    let mut out = String::new();
    out.push_str(
        "add_module tree_rm_idle\n\
         set_attribute module tree_rm_idle moduleName tree_wrapper\n\
         set_attribute module tree_rm_idle prj $prjDir/tree_idle.prj\n\n",
    );
    for p in partitions {
        for v in &p.variants {
            out.push_str(&format!(
                "add_module {rm}\n\
                 set_attribute module {rm} moduleName tree_wrapper\n\
                 set_attribute module {rm} prj $prjDir/tree_cl{class}_{round}.prj\n\n",
                rm = v.module_name(),
                class = v.class,
                round = v.round,
            ));
        }
    }
    out
}

fn configurations(partitions: &[PartitionAssignment], rp_variants: usize) -> String {
    let mut out = String::new();
    for variant in 0..rp_variants {
        out.push_str(&format!("add_implementation config_{variant}\n"));
        out.push_str(&format!("set_attribute impl config_{variant} top $top\n"));
        out.push_str(&format!("set_attribute impl config_{variant} pr.impl 1\n"));
        out.push_str(&format!(
            "set_attribute impl config_{variant} partitions [list \\\n    [list $static $top implement] \\\n"
        ));
        for p in partitions {
            let rm = match p.variants.get(variant) {
                Some(v) => v.module_name(),
                None => "tree_rm_idle".to_string(),
            };
            out.push_str(&format!(
                "    [list {rm} top_system_i/{cell} implement] \\\n",
                cell = p.partition_name(),
            ));
        }
        out.push_str("]\n\n");
    }
    out
}

fn bitstream_steps(partitions: &[PartitionAssignment], rp_variants: usize) -> String {
    let mut out = String::new();
    for variant in 0..rp_variants {
        let summary: Vec<String> = partitions
            .iter()
            .map(|p| {
                let rm = p
                    .variants
                    .get(variant)
                    .map(|v| v.module_name())
                    .unwrap_or_else(|| "tree_rm_idle".to_string());
                format!("{} <= {}", p.partition_name(), rm)
            })
            .collect();
        out.push_str(&format!(
            "puts \"Round {variant}: {}\"\n",
            summary.join(", ")
        ));
    }
    out
}

/// Writes the reconfigurable-system scripts: `scripts/design.tcl` and
/// `synth_and_impl.tcl` under the system tree root.
pub fn write_reconfig_scripts(
    ensemble: &Ensemble,
    config: &BuildConfig,
    layout: &Layout,
    system_dir: &Path,
) -> Result<(), BackendError> {
    let pdr = config.pdr().map_err(|e| {
        canopy_layout::LayoutError::Configuration(e.to_string())
    })?;
    let partitions = assign_modules(
        ensemble.trees.len(),
        pdr.trees_per_class,
        pdr.banks,
        pdr.trees_per_bank,
    );

    let design = system_bindings(config, layout)
        .set("rm_module_definitions", rm_module_definitions(&partitions))
        .set("configurations", configurations(&partitions, layout.rp_variants));
    render_to_file(assets::DESIGN_TCL, &design, &system_dir.join("scripts/design.tcl"))?;

    let impl_script = system_bindings(config, layout)
        .set("trees_per_class", pdr.trees_per_class)
        .set("bitstream_steps", bitstream_steps(&partitions, layout.rp_variants));
    render_to_file(
        assets::SYNTH_AND_IMPL_TCL,
        &impl_script,
        &system_dir.join("synth_and_impl.tcl"),
    )?;
    Ok(())
}
