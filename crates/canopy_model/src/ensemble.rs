//! Ensemble and tree structure types.

use serde::{Deserialize, Serialize};

use crate::error::ModelError;

/// A single decision tree, stored as parallel per-node arrays indexed by
/// node id.
///
/// Leaf nodes carry `-2` in `feature` and in both child arrays, matching the
/// scikit-learn export convention the upstream converter preserves.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Tree {
    /// Feature index tested at each node (`-2` for leaves).
    pub feature: Vec<i32>,
    /// Split threshold at each node.
    pub threshold: Vec<f64>,
    /// Score contribution at each node (meaningful at leaves).
    pub value: Vec<f64>,
    /// Left child node id (`-2` for leaves).
    pub children_left: Vec<i32>,
    /// Right child node id (`-2` for leaves).
    pub children_right: Vec<i32>,
    /// Parent node id (`-1` at the root).
    pub parent: Vec<i32>,
}

impl Tree {
    /// Number of nodes in the tree.
    pub fn n_nodes(&self) -> usize {
        self.feature.len()
    }

    /// Checks that every parallel array has the same length.
    pub fn is_consistent(&self) -> bool {
        let n = self.feature.len();
        self.threshold.len() == n
            && self.value.len() == n
            && self.children_left.len() == n
            && self.children_right.len() == n
            && self.parent.len() == n
    }
}

/// A trained tree ensemble as exported by the model converter.
///
/// `trees[class]` holds the boosting rounds for one output class; for binary
/// models there is a single class list. Immutable once loaded.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Ensemble {
    /// Trees organized per class, then per boosting round.
    pub trees: Vec<Vec<Tree>>,
    /// Total number of trees as declared by the converter.
    pub n_trees: usize,
    /// Maximum tree depth.
    pub max_depth: usize,
    /// Number of input features.
    pub n_features: usize,
    /// Number of output classes.
    pub n_classes: usize,
    /// Score normalization factor.
    pub norm: f64,
    /// Per-class initial prediction (bias) terms.
    pub init_predict: Vec<f64>,
}

impl Ensemble {
    /// Total number of trees across all classes, counted from the structure.
    pub fn tree_count(&self) -> usize {
        self.trees.iter().map(|t| t.len()).sum()
    }

    /// Maximum number of trees held by any single class.
    ///
    /// The downstream layout uses this as the output-class count, which only
    /// holds when every class has the same number of boosting rounds. That
    /// conflation is deliberate and preserved.
    pub fn max_trees_per_class(&self) -> usize {
        self.trees.iter().map(|t| t.len()).max().unwrap_or(0).max(1)
    }

    /// Validates the structural invariants the code generator relies on.
    pub fn validate(&self) -> Result<(), ModelError> {
        if self.trees.iter().all(|t| t.is_empty()) {
            return Err(ModelError::EmptyEnsemble);
        }
        for (class, trees) in self.trees.iter().enumerate() {
            for (index, tree) in trees.iter().enumerate() {
                if !tree.is_consistent() {
                    return Err(ModelError::RaggedTree { class, index });
                }
            }
        }
        if self.n_features == 0 {
            return Err(ModelError::InvalidMetadata(
                "n_features must be positive".to_string(),
            ));
        }
        if self.init_predict.is_empty() {
            return Err(ModelError::InvalidMetadata(
                "init_predict must have at least one entry".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

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
            n_trees: 3,
            max_depth: 1,
            n_features: 4,
            n_classes: 3,
            norm: 1.0,
            init_predict: vec![0.0, 0.0, 0.0],
        }
    }

    #[test]
    fn tree_count_sums_all_classes() {
        let e = three_class_ensemble();
        assert_eq!(e.tree_count(), 3);
    }

    #[test]
    fn max_trees_per_class_takes_maximum() {
        let mut e = three_class_ensemble();
        e.trees[1].push(stump(0.4));
        assert_eq!(e.max_trees_per_class(), 2);
    }

    #[test]
    fn validate_accepts_well_formed() {
        assert!(three_class_ensemble().validate().is_ok());
    }

    #[test]
    fn validate_rejects_empty() {
        let mut e = three_class_ensemble();
        e.trees = vec![vec![], vec![]];
        assert!(matches!(e.validate(), Err(ModelError::EmptyEnsemble)));
    }

    #[test]
    fn validate_rejects_ragged_tree() {
        let mut e = three_class_ensemble();
        e.trees[2][0].threshold.pop();
        assert!(matches!(
            e.validate(),
            Err(ModelError::RaggedTree { class: 2, index: 0 })
        ));
    }
}
