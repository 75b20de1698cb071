//! Region-partition assignment for partial-reconfiguration builds.
//!
//! Each physical `(bank, slot)` pair is a reconfigurable partition (RP); the
//! logical trees scheduled onto it across reconfiguration rounds are its
//! reconfigurable-module (RM) variants. Trees fill the array greedily in
//! class-major order, wrapping back to the first slot once the array is
//! full, so slot `k` serves trees `k`, `k + slots`, `k + 2*slots`, ...

/// One reconfigurable-module variant: a logical tree identified by its class
/// and its boosting round within that class.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RmVariant {
    /// Output class of the tree.
    pub class: usize,
    /// Boosting-round index of the tree within its class.
    pub round: usize,
}

impl RmVariant {
    /// The RM module name used throughout the generated Vivado scripts.
    pub fn module_name(&self) -> String {
        format!("tree_rm_{}_{}", self.class, self.round)
    }
}

/// One reconfigurable partition and the ordered RM variants scheduled onto
/// it, one per reconfiguration round.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PartitionAssignment {
    /// Physical bank index.
    pub bank: usize,
    /// Slot index within the bank.
    pub slot: usize,
    /// RM variants in reconfiguration-round order.
    pub variants: Vec<RmVariant>,
}

impl PartitionAssignment {
    /// The RP cell name used throughout the generated Vivado scripts.
    pub fn partition_name(&self) -> String {
        format!("tree_rp_{}_{}", self.bank, self.slot)
    }
}

/// Assigns every logical tree to a `(bank, slot, variant)` coordinate.
///
/// Returns one record per physical partition, banks outer and slots inner,
/// matching the order the `design.tcl` flow declares them in. For any
/// ensemble with `n_classes * trees_per_class <= banks * trees_per_bank *
/// rp_variants` the result is a bijection: each `(class, round)` pair
/// appears exactly once.
pub fn assign_modules(
    n_classes: usize,
    trees_per_class: usize,
    banks: usize,
    trees_per_bank: usize,
) -> Vec<PartitionAssignment> {
    let slots = banks * trees_per_bank;
    let mut per_slot: Vec<Vec<RmVariant>> = vec![Vec::new(); slots];

    let mut cursor = 0;
    for class in 0..n_classes {
        for round in 0..trees_per_class {
            per_slot[cursor].push(RmVariant { class, round });
            cursor = (cursor + 1) % slots;
        }
    }

    let mut assignments = Vec::with_capacity(slots);
    let mut per_slot = per_slot.into_iter();
    for bank in 0..banks {
        for slot in 0..trees_per_bank {
            assignments.push(PartitionAssignment {
                bank,
                slot,
                variants: per_slot.next().unwrap_or_default(),
            });
        }
    }
    assignments
}
