//! Filtering of device constraint templates down to the configured array.
//!
//! The per-part `.xdc` templates carry pblock sections for the largest
//! supported array, delimited by marker lines of the form
//! `## hls-fpga-machine-learning begin bank <n>` and
//! `## hls-fpga-machine-learning begin tree <n>`. Filtering keeps only the
//! sections whose bank and tree indices fall inside the configured array,
//! strips the marker lines, and preserves the original line order.

use crate::error::LayoutError;

/// Marker prefix opening a bank section.
const BANK_MARKER: &str = "## hls-fpga-machine-learning begin bank ";
/// Marker prefix opening a tree section inside the current bank.
const TREE_MARKER: &str = "## hls-fpga-machine-learning begin tree ";

/// Filters a constraint template to the configured `bank_count` x
/// `trees_per_bank` array.
///
/// A marker whose index does not parse is a fatal configuration mismatch,
/// as is a template without any bank marker at all.
pub fn filter_constraints(
    template: &str,
    bank_count: usize,
    trees_per_bank: usize,
) -> Result<String, LayoutError> {
    let mut out = String::new();
    let mut outputting_bank = false;
    let mut outputting_tree = false;
    let mut saw_bank_marker = false;

    for line in template.lines() {
        if let Some(rest) = line.trim_end().strip_prefix(BANK_MARKER) {
            let bank: usize = rest
                .trim()
                .parse()
                .map_err(|_| LayoutError::MalformedMarker(line.trim_end().to_string()))?;
            saw_bank_marker = true;
            outputting_bank = bank < bank_count;
            continue;
        }
        if let Some(rest) = line.trim_end().strip_prefix(TREE_MARKER) {
            if outputting_bank {
                let tree: usize = rest
                    .trim()
                    .parse()
                    .map_err(|_| LayoutError::MalformedMarker(line.trim_end().to_string()))?;
                outputting_tree = tree < trees_per_bank;
            }
            continue;
        }
        if outputting_bank && outputting_tree {
            out.push_str(line);
            out.push('\n');
        }
    }

    if !saw_bank_marker {
        return Err(LayoutError::MissingMarkers);
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn template(banks: usize, trees: usize) -> String {
        let mut t = String::from("# header comment, outside any section\n");
        for b in 0..banks {
            t.push_str(&format!("## hls-fpga-machine-learning begin bank {b}\n"));
            for tr in 0..trees {
                t.push_str(&format!("## hls-fpga-machine-learning begin tree {tr}\n"));
                t.push_str(&format!("create_pblock pblock_bank{b}_tree{tr}\n"));
                t.push_str(&format!(
                    "resize_pblock pblock_bank{b}_tree{tr} -add SLICE_X0Y{b}{tr}\n"
                ));
            }
        }
        t
    }

    #[test]
    fn keeps_only_configured_array() {
        let filtered = filter_constraints(&template(8, 4), 2, 2).unwrap();
        let expected = "\
create_pblock pblock_bank0_tree0
resize_pblock pblock_bank0_tree0 -add SLICE_X0Y00
create_pblock pblock_bank0_tree1
resize_pblock pblock_bank0_tree1 -add SLICE_X0Y01
create_pblock pblock_bank1_tree0
resize_pblock pblock_bank1_tree0 -add SLICE_X0Y10
create_pblock pblock_bank1_tree1
resize_pblock pblock_bank1_tree1 -add SLICE_X0Y11
";
        assert_eq!(filtered, expected);
    }

    #[test]
    fn marker_lines_are_stripped() {
        let filtered = filter_constraints(&template(2, 2), 2, 2).unwrap();
        assert!(!filtered.contains("hls-fpga-machine-learning"));
    }

    #[test]
    fn header_outside_sections_is_dropped() {
        let filtered = filter_constraints(&template(2, 2), 2, 2).unwrap();
        assert!(!filtered.contains("header comment"));
    }

    #[test]
    fn malformed_index_is_fatal() {
        let t = "## hls-fpga-machine-learning begin bank zero\nfoo\n";
        assert!(matches!(
            filter_constraints(t, 2, 2),
            Err(LayoutError::MalformedMarker(_))
        ));
    }

    #[test]
    fn template_without_markers_is_fatal() {
        assert!(matches!(
            filter_constraints("create_pblock p\n", 2, 2),
            Err(LayoutError::MissingMarkers)
        ));
    }
}
