//! Tree grower for gradient boosting.
//!
//! Grows one tree from per-row gradients using histogram split search, in-place
//! row partitioning and the subtraction trick: only the smaller child's
//! histogram is built from rows, the larger one is `parent - smaller`.

use crate::data::BinnedDataset;
use crate::repr::{MutableTree, NodeId as TreeNodeId, Tree};
use crate::utils::Parallelism;

use super::config::GrowthStrategy;
use super::gain::GainParams;
use super::histogram::{Histogram, HistogramLayout};
use super::objective::GradsTuple;
use super::partition::{NodeId, RowPartitioner};
use super::split::{find_best_split, NodeStats, SplitInfo};

/// Parameters for tree growth.
#[derive(Clone, Debug)]
pub struct GrowerParams {
    pub gain: GainParams,
    pub learning_rate: f32,
    pub growth_strategy: GrowthStrategy,
}

/// A node that may still be split.
struct NodeCandidate {
    node: NodeId,
    tree_node: TreeNodeId,
    depth: u32,
    stats: NodeStats,
    histogram: Histogram,
    split: Option<SplitInfo>,
}

/// Grows trees over one binned dataset, reusing buffers across rounds.
pub struct TreeGrower<'a> {
    dataset: &'a BinnedDataset,
    params: GrowerParams,
    parallelism: Parallelism,
    layout: HistogramLayout,
    partitioner: RowPartitioner,
    tree_builder: MutableTree,
    /// Learning-rate-scaled leaf value per partition node of the last tree.
    last_leaf_values: Vec<f32>,
}

impl<'a> TreeGrower<'a> {
    pub fn new(dataset: &'a BinnedDataset, params: GrowerParams, parallelism: Parallelism) -> Self {
        Self {
            dataset,
            layout: HistogramLayout::new(dataset),
            partitioner: RowPartitioner::new(dataset.n_rows()),
            tree_builder: MutableTree::new(),
            last_leaf_values: Vec::new(),
            params,
            parallelism,
        }
    }

    /// Grow a tree and add its output to `predictions`.
    ///
    /// The partitioner holds every row after growth, so predictions are
    /// updated per leaf range instead of traversing the tree per row.
    pub fn grow_and_update_predictions(&mut self, grad_hess: &[GradsTuple], predictions: &mut [f32]) -> Tree {
        debug_assert_eq!(predictions.len(), self.dataset.n_rows());

        let tree = self.grow(grad_hess);
        for (node, &value) in self.last_leaf_values.iter().enumerate() {
            if value.is_nan() {
                continue;
            }
            for &row in self.partitioner.rows(node as NodeId) {
                predictions[row as usize] += value;
            }
        }
        tree
    }

    /// Grow a tree from gradients. Leaf values include the learning rate.
    pub fn grow(&mut self, grad_hess: &[GradsTuple]) -> Tree {
        debug_assert_eq!(grad_hess.len(), self.dataset.n_rows());

        self.partitioner.reset();
        self.last_leaf_values.clear();
        let root_tree_node = self.tree_builder.init_root();

        let stats = grad_hess.iter().fold(NodeStats::default(), |acc, gh| NodeStats {
            grad: acc.grad + gh.grad as f64,
            hess: acc.hess + gh.hess as f64,
            count: acc.count + 1,
        });
        let histogram = Histogram::build(
            self.dataset,
            &self.layout,
            self.partitioner.rows(0),
            grad_hess,
            self.parallelism,
        );
        let root = self.candidate(0, root_tree_node, 0, stats, histogram);

        match self.params.growth_strategy {
            GrowthStrategy::DepthWise { max_depth } => self.grow_depth_wise(root, max_depth, grad_hess),
            GrowthStrategy::LeafWise { max_leaves } => self.grow_leaf_wise(root, max_leaves, grad_hess),
        }

        let mut builder = std::mem::take(&mut self.tree_builder);
        builder.apply_learning_rate(self.params.learning_rate);
        builder.freeze()
    }

    /// Expand every splittable node level by level.
    fn grow_depth_wise(&mut self, root: NodeCandidate, max_depth: u32, grad_hess: &[GradsTuple]) {
        let mut level = vec![root];
        for _ in 0..max_depth {
            let mut next = Vec::with_capacity(level.len() * 2);
            for mut candidate in level {
                match candidate.split.take() {
                    Some(split) => {
                        let (left, right) = self.expand(candidate, split, grad_hess);
                        next.push(left);
                        next.push(right);
                    }
                    None => self.finish_leaf(candidate),
                }
            }
            level = next;
        }
        level.into_iter().for_each(|c| self.finish_leaf(c));
    }

    /// Repeatedly expand the open node with the highest gain.
    fn grow_leaf_wise(&mut self, root: NodeCandidate, max_leaves: u32, grad_hess: &[GradsTuple]) {
        let mut open = vec![root];
        let mut n_leaves = 1u32;
        while n_leaves < max_leaves {
            let best = open
                .iter()
                .enumerate()
                .filter_map(|(i, c)| c.split.as_ref().map(|s| (i, s.gain)))
                .fold(None, |best: Option<(usize, f64)>, (i, gain)| match best {
                    Some((_, best_gain)) if best_gain >= gain => best,
                    _ => Some((i, gain)),
                });
            let Some((idx, _)) = best else { break };

            let mut candidate = open.remove(idx);
            let Some(split) = candidate.split.take() else {
                self.finish_leaf(candidate);
                break;
            };
            let (left, right) = self.expand(candidate, split, grad_hess);
            open.push(left);
            open.push(right);
            n_leaves += 1;
        }
        open.into_iter().for_each(|c| self.finish_leaf(c));
    }

    /// Apply the candidate's split and return the two children.
    fn expand(
        &mut self,
        candidate: NodeCandidate,
        split: SplitInfo,
        grad_hess: &[GradsTuple],
    ) -> (NodeCandidate, NodeCandidate) {
        let NodeCandidate {
            node,
            tree_node,
            depth,
            histogram,
            ..
        } = candidate;

        let threshold = self.dataset.mapper(split.feature).upper_bound(split.bin as usize);
        let (left_tree, right_tree) =
            self.tree_builder
                .apply_split(tree_node, split.feature as u32, threshold, split.gain as f32);

        let (right_node, left_count, right_count) =
            self.partitioner.split(node, split.feature, split.bin, self.dataset);
        debug_assert_eq!(left_count, split.left.count);
        debug_assert_eq!(right_count, split.right.count);

        let small_node = if left_count <= right_count { node } else { right_node };
        let small_hist = Histogram::build(
            self.dataset,
            &self.layout,
            self.partitioner.rows(small_node),
            grad_hess,
            self.parallelism,
        );
        let large_hist = small_hist.sibling_of(&histogram);
        let (left_hist, right_hist) = if small_node == node {
            (small_hist, large_hist)
        } else {
            (large_hist, small_hist)
        };

        let left = self.candidate(node, left_tree, depth + 1, split.left, left_hist);
        let right = self.candidate(right_node, right_tree, depth + 1, split.right, right_hist);
        (left, right)
    }

    fn candidate(
        &self,
        node: NodeId,
        tree_node: TreeNodeId,
        depth: u32,
        stats: NodeStats,
        histogram: Histogram,
    ) -> NodeCandidate {
        let can_split = match self.params.growth_strategy {
            GrowthStrategy::DepthWise { max_depth } => depth < max_depth,
            GrowthStrategy::LeafWise { .. } => true,
        } && stats.count >= 2 * self.params.gain.min_samples_leaf;

        let split = if can_split {
            find_best_split(&histogram, &self.layout, stats, &self.params.gain, self.parallelism)
        } else {
            None
        };
        NodeCandidate {
            node,
            tree_node,
            depth,
            stats,
            histogram,
            split,
        }
    }

    fn finish_leaf(&mut self, candidate: NodeCandidate) {
        let weight = self
            .params
            .gain
            .compute_leaf_weight(candidate.stats.grad, candidate.stats.hess);
        self.tree_builder.make_leaf(candidate.tree_node, weight);

        let node = candidate.node as usize;
        if node >= self.last_leaf_values.len() {
            self.last_leaf_values.resize(node + 1, f32::NAN);
        }
        self.last_leaf_values[node] = weight * self.params.learning_rate;
    }
}
