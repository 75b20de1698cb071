//! Embedded template and support-file sources.
//!
//! Everything the generator writes is compiled into the binary, so a build
//! needs no template search path at runtime.

/// Static BDT evaluation header, copied verbatim into `firmware/`.
pub const BDT_H: &str = include_str!("../templates/firmware/BDT.h");
/// Static AXI-Stream helper header, copied verbatim into `firmware/`.
pub const UTILS_H: &str = include_str!("../templates/firmware/utils.h");

/// Top-function source template, non-PDR.
pub const PROJECT_CPP: &str = include_str!("../templates/firmware/myproject.cpp.in");
/// Top-function header template, non-PDR.
pub const PROJECT_H: &str = include_str!("../templates/firmware/myproject.h.in");
/// Streaming-IP source template, PDR.
pub const PROJECT_PDR_CPP: &str = include_str!("../templates/firmware/myproject_pdr.cpp.in");
/// Streaming-IP header template, PDR.
pub const PROJECT_PDR_H: &str = include_str!("../templates/firmware/myproject_pdr.h.in");
/// Ensemble parameter header template.
pub const PARAMETERS_H: &str = include_str!("../templates/firmware/parameters.h.in");

/// C-simulation testbench template, non-PDR.
pub const PROJECT_TEST_CPP: &str = include_str!("../templates/myproject_test.cpp.in");
/// C-simulation testbench template, PDR.
pub const PROJECT_PDR_TEST_CPP: &str = include_str!("../templates/myproject_pdr_test.cpp.in");

/// HLS build script template, non-PDR.
pub const BUILD_PRJ_TCL: &str = include_str!("../templates/build_prj.tcl.in");
/// HLS build script template, PDR.
pub const BUILD_PDR_PRJ_TCL: &str = include_str!("../templates/build_pdr_prj.tcl.in");
/// Per-IP out-of-context HLS build script template.
pub const BUILD_PDR_IP_TCL: &str = include_str!("../templates/build_pdr_ip.tcl.in");

/// Tree-wrapper Vivado project script template.
pub const TREE_WRAPPER_TCL: &str = include_str!("../templates/system/tree_wrapper.tcl.in");
/// Top-system block-design script template.
pub const TOP_SYSTEM_TCL: &str = include_str!("../templates/system/top_system.tcl.in");
/// Static-shell synthesis script template.
pub const STATIC_SHELL_TCL: &str = include_str!("../templates/system/static_shell.tcl.in");
/// Partial-reconfiguration design script template.
pub const DESIGN_TCL: &str = include_str!("../templates/system/design.tcl.in");
/// Bitstream assembly driver template.
pub const SYNTH_AND_IMPL_TCL: &str = include_str!("../templates/system/synth_and_impl.tcl.in");

/// Static helper scripts copied into `scripts/tcl/`, as `(name, content)`.
pub const SYSTEM_TCL_HELPERS: &[(&str, &str)] = &[
    (
        "pr_utils.tcl",
        include_str!("../templates/system/scripts/pr_utils.tcl"),
    ),
    (
        "run.tcl",
        include_str!("../templates/system/scripts/run.tcl"),
    ),
];

/// Per-part pblock constraint templates, filtered down to the configured
/// array at generation time.
pub fn constraint_template(part: &str) -> Option<&'static str> {
    match part {
        "xcvu9p-flgb2104-2L-e" => Some(include_str!(
            "../templates/system/constrs/xcvu9p-flgb2104-2L-e.xdc"
        )),
        "xczu9eg-ffvb1156-2-e" => Some(include_str!(
            "../templates/system/constrs/xczu9eg-ffvb1156-2-e.xdc"
        )),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_part_has_template() {
        assert!(constraint_template("xcvu9p-flgb2104-2L-e").is_some());
        assert!(constraint_template("xc7a35ticpg236-1L").is_none());
    }

    #[test]
    fn constraint_templates_carry_full_array_markers() {
        let t = constraint_template("xczu9eg-ffvb1156-2-e").unwrap();
        assert!(t.contains("## hls-fpga-machine-learning begin bank 7"));
        assert!(t.contains("## hls-fpga-machine-learning begin tree 3"));
    }

    #[test]
    fn static_headers_are_not_templates() {
        assert!(!BDT_H.contains("{{"));
        assert!(!UTILS_H.contains("{{"));
    }
}
