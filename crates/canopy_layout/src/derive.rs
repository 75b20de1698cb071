//! Scalar layout derivation.

use canopy_config::BuildConfig;
use canopy_model::Ensemble;

use crate::error::LayoutError;

/// Depth of the per-bank sample buffers in the reconfigurable system.
///
/// Fixed by the hardware architecture; the sample-index bus is sized from it.
pub const MAX_PARALLEL_SAMPLES: u32 = 6;

/// The derived layout quantities, computed once per build and consumed
/// read-only by every template-rendering step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Layout {
    /// Total trees across all classes.
    pub tree_count: usize,
    /// Maximum trees held by any class; doubles as the output-class count.
    pub class_count: usize,
    /// Number of physical banks (1 for non-PDR builds).
    pub bank_count: usize,
    /// Tree-evaluation slots per bank (0 for non-PDR builds).
    pub trees_per_bank: usize,
    /// Number of reconfigurable-module variants needed to time-multiplex
    /// every tree across the physical array.
    pub rp_variants: usize,
    /// Width of the feature port: next-power-of-two of the precision width,
    /// times the feature count.
    pub port_width: u32,
    /// Byte-rounded precision width carried on the data bus.
    pub data_width: u32,
    /// Next-power-of-two stream width wrapping the data bus.
    pub stream_width: u32,
    /// Width of the sample-index side channel.
    pub sample_index_width: u32,
}

/// Smallest power of two greater than or equal to `n`.
fn next_pow2(n: u32) -> Result<u32, LayoutError> {
    if n == 0 {
        return Err(LayoutError::InvalidArithmetic(
            "next_pow2 argument must be positive".to_string(),
        ));
    }
    Ok(n.next_power_of_two())
}

/// `ceil(log2(n)) + 1`, the width needed to index `n` values with headroom.
fn index_width(n: u32) -> Result<u32, LayoutError> {
    if n == 0 {
        return Err(LayoutError::InvalidArithmetic(
            "index width argument must be positive".to_string(),
        ));
    }
    Ok(32 - (n - 1).leading_zeros() + 1)
}

impl Layout {
    /// Derives the layout from the ensemble and the build configuration.
    ///
    /// Fails when the ensemble is empty, when a PDR build is requested
    /// without its layout keys, or when any bitwidth would be computed from
    /// a non-positive argument.
    pub fn derive(ensemble: &Ensemble, config: &BuildConfig) -> Result<Layout, LayoutError> {
        let tree_count = ensemble.tree_count();
        if tree_count == 0 {
            return Err(LayoutError::Configuration(
                "ensemble has no trees".to_string(),
            ));
        }
        let class_count = ensemble.max_trees_per_class();

        let (bank_count, trees_per_bank, rp_variants) = match &config.pdr {
            Some(pdr) => {
                let slots = pdr.banks * pdr.trees_per_bank;
                if slots == 0 {
                    return Err(LayoutError::Configuration(
                        "banks and trees_per_bank must be positive".to_string(),
                    ));
                }
                (pdr.banks, pdr.trees_per_bank, tree_count.div_ceil(slots))
            }
            None => (1, 0, 1),
        };

        let precision_bits = config
            .precision_bits()
            .map_err(|e| LayoutError::Configuration(e.to_string()))?;
        let n_features = u32::try_from(ensemble.n_features)
            .map_err(|_| LayoutError::InvalidArithmetic("feature count overflow".to_string()))?;
        if n_features == 0 {
            return Err(LayoutError::InvalidArithmetic(
                "feature count must be positive".to_string(),
            ));
        }

        let port_width = next_pow2(precision_bits)? * n_features;
        let data_width = precision_bits.div_ceil(8) * 8;
        let stream_width = next_pow2(data_width)?;
        let sample_index_width = index_width(MAX_PARALLEL_SAMPLES)?;

        Ok(Layout {
            tree_count,
            class_count,
            bank_count,
            trees_per_bank,
            rp_variants,
            port_width,
            data_width,
            stream_width,
            sample_index_width,
        })
    }
}
