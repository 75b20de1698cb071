//! Generation of the synthesizable firmware sources and the testbench.

use std::path::Path;

use canopy_config::BuildConfig;
use canopy_layout::{Layout, MAX_PARALLEL_SAMPLES};
use canopy_model::{Ensemble, Tree};
use canopy_render::{render_to_file, Bindings};

use crate::assets;
use crate::error::BackendError;

/// Formats a float so it always reads as a C++ floating literal.
fn cpp_float(v: f64) -> String {
    if v.fract() == 0.0 && v.is_finite() {
        format!("{v:.1}")
    } else {
        format!("{v}")
    }
}

fn join_ints(xs: &[i32]) -> String {
    xs.iter()
        .map(|x| x.to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

fn join_floats(xs: &[f64]) -> String {
    xs.iter().map(|x| cpp_float(*x)).collect::<Vec<_>>().join(", ")
}

/// One aggregate initializer for a [`Tree`], field order matching `BDT::Tree`.
fn tree_initializer(tree: &Tree) -> String {
    format!(
        "{{{{{feature}}}, {{{threshold}}}, {{{value}}}, {{{left}}}, {{{right}}}, {{{parent}}}}}",
        feature = join_ints(&tree.feature),
        threshold = join_floats(&tree.threshold),
        value = join_floats(&tree.value),
        left = join_ints(&tree.children_left),
        right = join_ints(&tree.children_right),
        parent = join_ints(&tree.parent),
    )
}

/// The nested initializer for `bdt.trees`: boosting rounds outer, classes
/// inner, matching the `trees[n_trees][fn_classes]` array in `BDT.h`.
fn tree_initializers(ensemble: &Ensemble, layout: &Layout) -> String {
    let mut rounds = Vec::new();
    for round in 0..layout.class_count {
        let mut row = Vec::new();
        for trees in &ensemble.trees {
            if let Some(tree) = trees.get(round) {
                row.push(tree_initializer(tree));
            }
        }
        rounds.push(format!("{{{}}}", row.join(",\n     ")));
    }
    format!("{{{}}}", rounds.join(",\n    "))
}

fn include_guard(project: &str) -> String {
    project.to_uppercase().replace(|c: char| !c.is_ascii_alphanumeric(), "_")
}

/// Block of PDR-only constants injected into `parameters.h`.
fn pdr_constants(config: &BuildConfig, layout: &Layout) -> String {
    let Some(pdr) = &config.pdr else {
        return String::new();
    };
    format!(
        "#include \"ap_int.h\"\n\n\
         static const int bank_count = {banks};\n\
         static const int trees_per_bank = {per_bank};\n\
         static const int trees_per_class = {per_class};\n\
         static const int max_parallel_samples = {samples};\n\
         static const int stream_width = {stream};\n\
         static const int sample_index_width = {index};\n\
         typedef ap_uint<{index}> sample_index_t;\n",
        banks = pdr.banks,
        per_bank = pdr.trees_per_bank,
        per_class = pdr.trees_per_class,
        samples = MAX_PARALLEL_SAMPLES,
        stream = layout.stream_width,
        index = layout.sample_index_width,
    )
}

fn bank_buffer_functions(layout: &Layout) -> String {
    let mut out = String::new();
    for bank in 1..=layout.bank_count {
        out.push_str(&format!(
            "void bank_buffer_{bank}(hls::stream<input_packet_t> &x_in,\n\
             \x20                   hls::stream<input_packet_t> &x_out) {{\n\
             #pragma HLS interface axis port = x_in\n\
             #pragma HLS interface axis port = x_out\n\
             #pragma HLS interface ap_ctrl_none port = return\n\
             \x20 forward_packets(x_in, x_out, n_features);\n\
             }}\n\n"
        ));
    }
    out
}

fn tree_functions(ensemble: &Ensemble) -> String {
    let mut out = String::new();
    for (class, trees) in ensemble.trees.iter().enumerate() {
        for round in 0..trees.len() {
            out.push_str(&format!(
                "void tree_cl{class}_{round}(hls::stream<input_packet_t> &x_in,\n\
                 \x20                 hls::stream<score_packet_t> &score_out) {{\n\
                 #pragma HLS interface axis port = x_in\n\
                 #pragma HLS interface axis port = score_out\n\
                 #pragma HLS interface ap_ctrl_none port = return\n\
                 \x20 input_arr_t x;\n\
                 \x20 for (int i = 0; i < n_features; i++) {{\n\
                 #pragma HLS pipeline II = 1\n\
                 \x20   x[i] = packet_to_value<input_t>(x_in.read());\n\
                 \x20 }}\n\
                 \x20 score_t s = bdt.trees[{round}][{class}].decision_function(x);\n\
                 \x20 score_packet_t out;\n\
                 \x20 value_to_packet<score_t, score_packet_t>(s, out, true);\n\
                 \x20 score_out.write(out);\n\
                 }}\n\n"
            ));
        }
    }
    out
}

fn voting_functions(ensemble: &Ensemble) -> String {
    let mut out = String::new();
    for (class, trees) in ensemble.trees.iter().enumerate() {
        let rounds = trees.len();
        out.push_str(&format!(
            "void voting_station_cl{class}(hls::stream<score_packet_t> &score_in,\n\
             \x20                        hls::stream<score_packet_t> &score_out) {{\n\
             #pragma HLS interface axis port = score_in\n\
             #pragma HLS interface axis port = score_out\n\
             #pragma HLS interface ap_ctrl_none port = return\n\
             \x20 score_t acc = bdt.init_predict[{class}];\n\
             \x20 for (int t = 0; t < {rounds}; t++) {{\n\
             #pragma HLS pipeline II = 1\n\
             \x20   acc += packet_to_value<score_t>(score_in.read());\n\
             \x20 }}\n\
             \x20 score_packet_t out;\n\
             \x20 value_to_packet<score_t, score_packet_t>(acc * bdt.normalisation, out, true);\n\
             \x20 score_out.write(out);\n\
             }}\n\n"
        ));
    }
    out
}

fn bank_buffer_prototypes(layout: &Layout) -> String {
    (1..=layout.bank_count)
        .map(|b| {
            format!(
                "void bank_buffer_{b}(hls::stream<input_packet_t> &x_in, \
                 hls::stream<input_packet_t> &x_out);\n"
            )
        })
        .collect()
}

fn tree_prototypes(ensemble: &Ensemble) -> String {
    let mut out = String::new();
    for (class, trees) in ensemble.trees.iter().enumerate() {
        for round in 0..trees.len() {
            out.push_str(&format!(
                "void tree_cl{class}_{round}(hls::stream<input_packet_t> &x_in, \
                 hls::stream<score_packet_t> &score_out);\n"
            ));
        }
    }
    out
}

fn voting_prototypes(ensemble: &Ensemble) -> String {
    (0..ensemble.trees.len())
        .map(|c| {
            format!(
                "void voting_station_cl{c}(hls::stream<score_packet_t> &score_in, \
                 hls::stream<score_packet_t> &score_out);\n"
            )
        })
        .collect()
}

/// Testbench block driving every tree IP in ensemble order, folding the
/// scores per class and recording the raw per-tree scores, mirroring what
/// the hardware crossbar delivers.
fn tree_dispatch(ensemble: &Ensemble) -> String {
    let mut out = String::new();
    for (class, trees) in ensemble.trees.iter().enumerate() {
        for round in 0..trees.len() {
            out.push_str(&format!(
                "  {{\n\
                 \x20   hls::stream<input_packet_t> xs;\n\
                 \x20   hls::stream<score_packet_t> ss;\n\
                 \x20   for (int i = 0; i < n_features; i++) {{\n\
                 \x20     input_packet_t pkt;\n\
                 \x20     value_to_packet<input_t, input_packet_t>(x[i], pkt, i == n_features - 1);\n\
                 \x20     xs.write(pkt);\n\
                 \x20   }}\n\
                 \x20   tree_cl{class}_{round}(xs, ss);\n\
                 \x20   score_t s = packet_to_value<score_t>(ss.read());\n\
                 \x20   class_score[{class}] += s;\n\
                 \x20   tree_scores.push_back((double)s);\n\
                 \x20 }}\n"
            ));
        }
    }
    for class in 0..ensemble.trees.len() {
        out.push_str(&format!(
            "  class_score[{class}] = (class_score[{class}] + bdt.init_predict[{class}]) * \
             bdt.normalisation;\n"
        ));
    }
    out
}

/// Writes `firmware/<project>.cpp`, `firmware/<project>.h`,
/// `firmware/parameters.h` and `<project>_test.cpp` under `out_dir`.
pub fn write_firmware(
    ensemble: &Ensemble,
    config: &BuildConfig,
    layout: &Layout,
    out_dir: &Path,
) -> Result<(), BackendError> {
    let project = &config.project_name;
    let guard = include_guard(project);
    let firmware = out_dir.join("firmware");

    let params = Bindings::new()
        .set("guard", &guard)
        .set("n_trees", ensemble.n_trees)
        .set("max_depth", ensemble.max_depth)
        .set("n_features", ensemble.n_features)
        .set("n_classes", ensemble.n_classes)
        .set("precision", &config.precision)
        .set("norm", cpp_float(ensemble.norm))
        .set("init_predict", format!("{{{}}}", join_floats(&ensemble.init_predict)))
        .set("tree_initializers", tree_initializers(ensemble, layout))
        .set("pdr_constants", pdr_constants(config, layout));
    render_to_file(assets::PARAMETERS_H, &params, &firmware.join("parameters.h"))?;

    if config.is_pdr() {
        let cpp = Bindings::new()
            .set("project", project)
            .set("bank_buffer_functions", bank_buffer_functions(layout))
            .set("tree_functions", tree_functions(ensemble))
            .set("voting_functions", voting_functions(ensemble));
        render_to_file(
            assets::PROJECT_PDR_CPP,
            &cpp,
            &firmware.join(format!("{project}.cpp")),
        )?;

        let header = Bindings::new()
            .set("guard", &guard)
            .set("bank_buffer_prototypes", bank_buffer_prototypes(layout))
            .set("tree_prototypes", tree_prototypes(ensemble))
            .set("voting_prototypes", voting_prototypes(ensemble));
        render_to_file(
            assets::PROJECT_PDR_H,
            &header,
            &firmware.join(format!("{project}.h")),
        )?;

        let test = Bindings::new()
            .set("project", project)
            .set("tree_dispatch", tree_dispatch(ensemble));
        render_to_file(
            assets::PROJECT_PDR_TEST_CPP,
            &test,
            &out_dir.join(format!("{project}_test.cpp")),
        )?;
    } else {
        let cpp = Bindings::new().set("project", project);
        render_to_file(
            assets::PROJECT_CPP,
            &cpp,
            &firmware.join(format!("{project}.cpp")),
        )?;

        let header = Bindings::new().set("project", project).set("guard", &guard);
        render_to_file(
            assets::PROJECT_H,
            &header,
            &firmware.join(format!("{project}.h")),
        )?;

        let test = Bindings::new().set("project", project);
        render_to_file(
            assets::PROJECT_TEST_CPP,
            &test,
            &out_dir.join(format!("{project}_test.cpp")),
        )?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use canopy_model::Tree;

    fn stump(leaf: f64) -> Tree {
        Tree {
            feature: vec![0, -2, -2],
            threshold: vec![0.5, -2.0, -2.0],
            value: vec![0.0, -leaf, leaf],
            children_left: vec![1, -2, -2],
            children_right: vec![2, -2, -2],
            parent: vec![-1, 0, 0],
        }
    }

    fn three_class_ensemble() -> Ensemble {
        Ensemble {
            trees: vec![vec![stump(0.1)], vec![stump(0.2)], vec![stump(0.3)]],
            n_trees: 1,
            max_depth: 1,
            n_features: 4,
            n_classes: 3,
            norm: 1.0,
            init_predict: vec![0.5, 0.25, 0.125],
        }
    }

    #[test]
    fn cpp_float_always_has_a_point() {
        assert_eq!(cpp_float(1.0), "1.0");
        assert_eq!(cpp_float(-2.0), "-2.0");
        assert_eq!(cpp_float(0.125), "0.125");
    }

    #[test]
    fn tree_initializer_field_order() {
        let init = tree_initializer(&stump(1.0));
        assert_eq!(
            init,
            "{{0, -2, -2}, {0.5, -2.0, -2.0}, {0.0, -1.0, 1.0}, {1, -2, -2}, {2, -2, -2}, {-1, 0, 0}}"
        );
    }

    #[test]
    fn parameters_has_three_trees_in_class_order() {
        let dir = tempfile::tempdir().unwrap();
        let ensemble = three_class_ensemble();
        let config = canopy_config::BuildConfig::auto_config();
        let layout = Layout::derive(&ensemble, &config).unwrap();
        write_firmware(&ensemble, &config, &layout, dir.path()).unwrap();

        let params = std::fs::read_to_string(dir.path().join("firmware/parameters.h")).unwrap();
        assert!(params.contains("{0.5, 0.25, 0.125}"));
        // Class order 0, 1, 2 shows up as the leaf values in sequence.
        let p0 = params.find("-0.1").unwrap();
        let p1 = params.find("-0.2").unwrap();
        let p2 = params.find("-0.3").unwrap();
        assert!(p0 < p1 && p1 < p2);
        assert!(params.contains("static const int n_classes = 3;"));
        assert!(!params.contains("bank_count"));
    }

    #[test]
    fn non_pdr_firmware_file_set() {
        let dir = tempfile::tempdir().unwrap();
        let ensemble = three_class_ensemble();
        let config = canopy_config::BuildConfig::auto_config();
        let layout = Layout::derive(&ensemble, &config).unwrap();
        write_firmware(&ensemble, &config, &layout, dir.path()).unwrap();

        assert!(dir.path().join("firmware/my_prj.cpp").exists());
        assert!(dir.path().join("firmware/my_prj.h").exists());
        assert!(dir.path().join("my_prj_test.cpp").exists());
        let cpp = std::fs::read_to_string(dir.path().join("firmware/my_prj.cpp")).unwrap();
        assert!(cpp.contains("void my_prj(input_arr_t x"));
        assert!(!cpp.contains("tree_cl"));
    }

    #[test]
    fn pdr_firmware_declares_every_ip() {
        let toml = r#"
project_name = "iris"
output_dir = "o"
precision = "ap_fixed<18,8>"
xilinx_part = "xczu9eg-ffvb1156-2-e"
xilinx_board = "b"
clock_period = 5

[pdr]
banks = 2
trees_per_bank = 2
trees_per_class = 1
"#;
        let config = canopy_config::load_config_from_str(toml).unwrap();
        let dir = tempfile::tempdir().unwrap();
        let ensemble = three_class_ensemble();
        let layout = Layout::derive(&ensemble, &config).unwrap();
        write_firmware(&ensemble, &config, &layout, dir.path()).unwrap();

        let cpp = std::fs::read_to_string(dir.path().join("firmware/iris.cpp")).unwrap();
        for ip in [
            "tree_cl0_0", "tree_cl1_0", "tree_cl2_0",
            "voting_station_cl0", "voting_station_cl2",
            "bank_buffer_1", "bank_buffer_2",
            "tree_idle", "enumerator", "vote_buffer",
        ] {
            assert!(cpp.contains(ip), "missing IP function {ip}");
        }
        let params = std::fs::read_to_string(dir.path().join("firmware/parameters.h")).unwrap();
        assert!(params.contains("static const int bank_count = 2;"));
        assert!(params.contains("static const int max_parallel_samples = 6;"));
    }

    #[test]
    fn pdr_testbench_emits_both_result_logs() {
        let toml = r#"
project_name = "iris"
output_dir = "o"
precision = "ap_fixed<18,8>"
xilinx_part = "xczu9eg-ffvb1156-2-e"
xilinx_board = "b"
clock_period = 5

[pdr]
banks = 2
trees_per_bank = 2
trees_per_class = 1
"#;
        let config = canopy_config::load_config_from_str(toml).unwrap();
        let dir = tempfile::tempdir().unwrap();
        let ensemble = three_class_ensemble();
        let layout = Layout::derive(&ensemble, &config).unwrap();
        write_firmware(&ensemble, &config, &layout, dir.path()).unwrap();

        // The predict flow reads both logs back, so the testbench must
        // write the per-tree scores as well as the class scores.
        let test = std::fs::read_to_string(dir.path().join("iris_test.cpp")).unwrap();
        assert!(test.contains("tb_data/csim_results.log"));
        assert!(test.contains("tb_data/csim_tree_results.log"));
        assert!(test.contains("tree_scores.push_back((double)s);"));
        assert_eq!(test.matches("tree_scores.push_back").count(), 3);
    }
}
