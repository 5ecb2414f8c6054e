//! Row partitioning for tree training.
//!
//! All row indices live in one contiguous buffer; each node owns a range of
//! it. Splitting a node partitions its range in place, the node keeps the
//! left-going rows and a newly allocated node gets the right-going ones.
//!
//! ```text
//! Initial (all rows in node 0):
//!   indices: [0, 1, 2, 3, 4, 5]
//!   begin: [0], count: [6]
//!
//! After splitting node 0 (rows 0,2,4 go left):
//!   indices: [0, 2, 4, 1, 3, 5]
//!   begin: [0, 3], count: [3, 3]
//! ```

use crate::data::BinnedDataset;

/// Node identifier used while growing (not the final tree node index).
pub type NodeId = u32;

/// Row indices per training node.
#[derive(Debug, Clone)]
pub struct RowPartitioner {
    indices: Box<[u32]>,
    begin: Vec<u32>,
    count: Vec<u32>,
    /// Scratch buffer for right-going rows, keeps the partition stable.
    scratch: Vec<u32>,
}

impl RowPartitioner {
    /// Partitioner with every row in node 0.
    pub fn new(n_rows: usize) -> Self {
        let mut partitioner = Self {
            indices: (0..n_rows as u32).collect(),
            begin: Vec::new(),
            count: Vec::new(),
            scratch: Vec::with_capacity(n_rows),
        };
        partitioner.reset();
        partitioner
    }

    /// Put every row back into node 0, in ascending order.
    pub fn reset(&mut self) {
        for (i, idx) in self.indices.iter_mut().enumerate() {
            *idx = i as u32;
        }
        self.begin.clear();
        self.count.clear();
        self.begin.push(0);
        self.count.push(self.indices.len() as u32);
    }

    /// Number of allocated nodes.
    #[cfg(test)]
    pub fn n_nodes(&self) -> usize {
        self.begin.len()
    }

    /// Rows of a node.
    #[inline]
    pub fn rows(&self, node: NodeId) -> &[u32] {
        let begin = self.begin[node as usize] as usize;
        let count = self.count[node as usize] as usize;
        &self.indices[begin..begin + count]
    }

    #[cfg(test)]
    pub fn count(&self, node: NodeId) -> u32 {
        self.count[node as usize]
    }

    /// Split `node` on `feature`: rows with `bin <= threshold_bin` stay in
    /// `node`, the others move to a new node.
    ///
    /// Returns `(right_node, left_count, right_count)`. Relative row order is
    /// preserved on both sides.
    pub fn split(
        &mut self,
        node: NodeId,
        feature: usize,
        threshold_bin: u8,
        dataset: &BinnedDataset,
    ) -> (NodeId, u32, u32) {
        let bins = dataset.feature_bins(feature);
        let begin = self.begin[node as usize] as usize;
        let end = begin + self.count[node as usize] as usize;

        self.scratch.clear();
        let mut left_end = begin;
        for i in begin..end {
            let row = self.indices[i];
            if bins[row as usize] <= threshold_bin {
                self.indices[left_end] = row;
                left_end += 1;
            } else {
                self.scratch.push(row);
            }
        }
        self.indices[left_end..end].copy_from_slice(&self.scratch);

        let left_count = (left_end - begin) as u32;
        let right_count = (end - left_end) as u32;

        self.count[node as usize] = left_count;
        let right_node = self.begin.len() as NodeId;
        self.begin.push(left_end as u32);
        self.count.push(right_count);

        (right_node, left_count, right_count)
    }
}
