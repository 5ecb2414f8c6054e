//! Binary decision tree storage and the mutable builder used during training.
//!
//! Nodes are stored as parallel arrays (structure of arrays). Node 0 is the
//! root; a split node sends `value <= threshold` to the left child.

use serde::{Deserialize, Serialize};

/// Index of a node within one tree.
pub type NodeId = u32;

// ============================================================================
// Tree
// ============================================================================

/// Immutable decision tree with scalar leaves.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tree {
    split_indices: Box<[u32]>,
    split_thresholds: Box<[f32]>,
    left_children: Box<[u32]>,
    right_children: Box<[u32]>,
    is_leaf: Box<[bool]>,
    leaf_values: Box<[f32]>,
    /// Gain of each split node (0 for leaves).
    gains: Box<[f32]>,
}

/// Structural problems found by [`Tree::validate`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TreeValidationError {
    #[error("tree has no nodes")]
    EmptyTree,
    #[error("node arrays have inconsistent lengths")]
    LengthMismatch,
    #[error("node {node}: {side} child {child} is out of bounds ({n_nodes} nodes)")]
    ChildOutOfBounds {
        node: NodeId,
        side: &'static str,
        child: NodeId,
        n_nodes: usize,
    },
    #[error("node {node} is not reached exactly once from the root")]
    InvalidTopology { node: NodeId },
    #[error("node {node} splits on feature {feature} but the model has {n_features} features")]
    FeatureOutOfBounds {
        node: NodeId,
        feature: u32,
        n_features: usize,
    },
}

impl Tree {
    /// Single-leaf tree.
    pub fn leaf(value: f32) -> Self {
        let mut builder = MutableTree::new();
        let root = builder.init_root();
        builder.make_leaf(root, value);
        builder.freeze()
    }

    #[inline]
    pub fn n_nodes(&self) -> usize {
        self.is_leaf.len()
    }

    /// Number of leaves.
    pub fn n_leaves(&self) -> usize {
        self.is_leaf.iter().filter(|&&leaf| leaf).count()
    }

    #[inline]
    pub fn is_leaf(&self, node: NodeId) -> bool {
        self.is_leaf[node as usize]
    }

    #[inline]
    pub fn split_index(&self, node: NodeId) -> u32 {
        self.split_indices[node as usize]
    }

    #[inline]
    pub fn split_threshold(&self, node: NodeId) -> f32 {
        self.split_thresholds[node as usize]
    }

    #[inline]
    pub fn left_child(&self, node: NodeId) -> NodeId {
        self.left_children[node as usize]
    }

    #[inline]
    pub fn right_child(&self, node: NodeId) -> NodeId {
        self.right_children[node as usize]
    }

    #[inline]
    pub fn leaf_value(&self, node: NodeId) -> f32 {
        self.leaf_values[node as usize]
    }

    #[inline]
    pub fn gain(&self, node: NodeId) -> f32 {
        self.gains[node as usize]
    }

    /// Leaf reached by `features`.
    #[inline]
    pub fn predict_leaf(&self, features: &[f32]) -> NodeId {
        let mut node = 0;
        while !self.is_leaf(node) {
            let value = features[self.split_index(node) as usize];
            node = if value <= self.split_threshold(node) {
                self.left_child(node)
            } else {
                self.right_child(node)
            };
        }
        node
    }

    /// Leaf value for one row.
    #[inline]
    pub fn predict_row(&self, features: &[f32]) -> f32 {
        self.leaf_value(self.predict_leaf(features))
    }

    /// Check that the tree is a proper binary tree over `n_features` features.
    ///
    /// Deserialized trees must pass this before they are used for prediction.
    pub fn validate(&self, n_features: usize) -> Result<(), TreeValidationError> {
        let n_nodes = self.n_nodes();
        if n_nodes == 0 {
            return Err(TreeValidationError::EmptyTree);
        }
        if [
            self.split_indices.len(),
            self.split_thresholds.len(),
            self.left_children.len(),
            self.right_children.len(),
            self.leaf_values.len(),
            self.gains.len(),
        ]
        .iter()
        .any(|&len| len != n_nodes)
        {
            return Err(TreeValidationError::LengthMismatch);
        }

        let mut visited = vec![false; n_nodes];
        let mut stack = vec![0u32];
        while let Some(node) = stack.pop() {
            if std::mem::replace(&mut visited[node as usize], true) {
                return Err(TreeValidationError::InvalidTopology { node });
            }
            if self.is_leaf(node) {
                continue;
            }
            let feature = self.split_index(node);
            if feature as usize >= n_features {
                return Err(TreeValidationError::FeatureOutOfBounds {
                    node,
                    feature,
                    n_features,
                });
            }
            for (side, child) in [("left", self.left_child(node)), ("right", self.right_child(node))] {
                if child as usize >= n_nodes {
                    return Err(TreeValidationError::ChildOutOfBounds {
                        node,
                        side,
                        child,
                        n_nodes,
                    });
                }
                stack.push(child);
            }
        }

        match visited.iter().position(|&seen| !seen) {
            Some(node) => Err(TreeValidationError::InvalidTopology { node: node as NodeId }),
            None => Ok(()),
        }
    }
}

// ============================================================================
// MutableTree
// ============================================================================

/// Tree under construction.
///
/// Nodes are allocated on demand by [`MutableTree::apply_split`]; every
/// allocated node must end up either split or turned into a leaf before
/// [`MutableTree::freeze`].
#[derive(Debug, Clone, Default)]
pub struct MutableTree {
    split_indices: Vec<u32>,
    split_thresholds: Vec<f32>,
    left_children: Vec<u32>,
    right_children: Vec<u32>,
    is_leaf: Vec<bool>,
    leaf_values: Vec<f32>,
    gains: Vec<f32>,
}

impl MutableTree {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(n_nodes: usize) -> Self {
        Self {
            split_indices: Vec::with_capacity(n_nodes),
            split_thresholds: Vec::with_capacity(n_nodes),
            left_children: Vec::with_capacity(n_nodes),
            right_children: Vec::with_capacity(n_nodes),
            is_leaf: Vec::with_capacity(n_nodes),
            leaf_values: Vec::with_capacity(n_nodes),
            gains: Vec::with_capacity(n_nodes),
        }
    }

    /// Clear and allocate the root node.
    pub fn init_root(&mut self) -> NodeId {
        *self = Self::with_capacity(self.is_leaf.capacity());
        self.allocate()
    }

    fn allocate(&mut self) -> NodeId {
        let id = self.is_leaf.len() as NodeId;
        self.split_indices.push(0);
        self.split_thresholds.push(0.0);
        self.left_children.push(0);
        self.right_children.push(0);
        self.is_leaf.push(false);
        self.leaf_values.push(0.0);
        self.gains.push(0.0);
        id
    }

    /// Turn `node` into a numeric split and allocate its children.
    ///
    /// Returns `(left, right)`.
    pub fn apply_split(&mut self, node: NodeId, feature: u32, threshold: f32, gain: f32) -> (NodeId, NodeId) {
        let left = self.allocate();
        let right = self.allocate();
        let i = node as usize;
        self.split_indices[i] = feature;
        self.split_thresholds[i] = threshold;
        self.left_children[i] = left;
        self.right_children[i] = right;
        self.gains[i] = gain;
        (left, right)
    }

    pub fn make_leaf(&mut self, node: NodeId, value: f32) {
        let i = node as usize;
        self.is_leaf[i] = true;
        self.leaf_values[i] = value;
    }

    /// Multiply every leaf value by `learning_rate`.
    pub fn apply_learning_rate(&mut self, learning_rate: f32) {
        for (value, &leaf) in self.leaf_values.iter_mut().zip(&self.is_leaf) {
            if leaf {
                *value *= learning_rate;
            }
        }
    }

    #[inline]
    pub fn n_nodes(&self) -> usize {
        self.is_leaf.len()
    }

    pub fn freeze(self) -> Tree {
        Tree {
            split_indices: self.split_indices.into_boxed_slice(),
            split_thresholds: self.split_thresholds.into_boxed_slice(),
            left_children: self.left_children.into_boxed_slice(),
            right_children: self.right_children.into_boxed_slice(),
            is_leaf: self.is_leaf.into_boxed_slice(),
            leaf_values: self.leaf_values.into_boxed_slice(),
            gains: self.gains.into_boxed_slice(),
        }
    }
}
