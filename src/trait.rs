//! The query-only phase: depth-first range search over a finalized packed buffer.

use crate::constants::RECORD_WIDTH;
use crate::index::{HilbertRTree, HilbertRTreeRef};
use crate::num::IndexableNum;
use crate::util::upper_bound;

/// Shared read API over a finalized packed Hilbert R-tree, whether owned or borrowed.
///
/// Implemented for [`HilbertRTree`] and [`HilbertRTreeRef`]. There is deliberately no impl for
/// [`HilbertRTreeBuilder`][crate::builder::HilbertRTreeBuilder]: a builder isn't finalized, and
/// the distilled spec's "search before finalize" error has no runtime representation here
/// because the type system already rules it out.
pub trait HilbertRTreeIndex<N: IndexableNum> {
    /// The full packed buffer: leaf records, then each level of parent records, root last.
    fn records(&self) -> &[N];

    /// The number of leaves (as opposed to internal nodes) in the tree.
    fn num_items(&self) -> usize;

    /// The branching factor used to pack this tree.
    fn node_size(&self) -> usize;

    /// Cumulative slot-unit bound of each level, leaf level first, root level last.
    fn level_bounds(&self) -> &[usize];

    /// The number of levels (height) of the tree.
    fn num_levels(&self) -> usize {
        self.level_bounds().len()
    }

    /// The global bounding box of every indexed rectangle — the root record's box.
    fn extrema(&self) -> (N, N, N, N) {
        let records = self.records();
        let root = records.len() - RECORD_WIDTH;
        (
            records[root + 1],
            records[root + 2],
            records[root + 3],
            records[root + 4],
        )
    }

    /// The box slots belonging to one level of the tree, level 0 being the leaves.
    ///
    /// Returns `None` if `level` is out of range.
    fn boxes_at_level(&self, level: usize) -> Option<&[N]> {
        let level_bounds = self.level_bounds();
        if level >= level_bounds.len() {
            return None;
        }
        let start = if level == 0 { 0 } else { level_bounds[level - 1] };
        Some(&self.records()[start..level_bounds[level]])
    }

    /// Search for every leaf whose box overlaps `(min_x, min_y, max_x, max_y)` inclusively.
    ///
    /// Results are in deterministic depth-first order, not sorted by reference.
    fn search(&self, min_x: N, min_y: N, max_x: N, max_y: N) -> Vec<usize> {
        self.search_filtered(min_x, min_y, max_x, max_y, |_| true)
    }

    /// Like [`search`][Self::search], but a candidate leaf is only kept when `filter` returns
    /// `true` for its reference. `filter` is consulted exactly once per candidate leaf.
    fn search_filtered(
        &self,
        min_x: N,
        min_y: N,
        max_x: N,
        max_y: N,
        filter: impl Fn(usize) -> bool,
    ) -> Vec<usize> {
        let records = self.records();
        let leaf_bound = self.num_items() * RECORD_WIDTH;

        let mut node_index = Some(records.len() - RECORD_WIDTH);
        let mut queue = Vec::new();
        let mut results = Vec::new();

        while let Some(index) = node_index {
            let end = (index + self.node_size() * RECORD_WIDTH).min(upper_bound(index, self.level_bounds()));

            let mut pos = index;
            while pos < end {
                let rec_min_x = records[pos + 1];
                let rec_min_y = records[pos + 2];
                let rec_max_x = records[pos + 3];
                let rec_max_y = records[pos + 4];

                let overlaps = !(max_x < rec_min_x
                    || max_y < rec_min_y
                    || min_x > rec_max_x
                    || min_y > rec_max_y);

                if overlaps {
                    let reference = records[pos].to_ref();
                    if index < leaf_bound {
                        if filter(reference) {
                            results.push(reference);
                        }
                    } else {
                        queue.push(reference);
                    }
                }

                pos += RECORD_WIDTH;
            }

            node_index = queue.pop();
        }

        results
    }
}

impl<N: IndexableNum> HilbertRTreeIndex<N> for HilbertRTree<N> {
    fn records(&self) -> &[N] {
        &self.records
    }

    fn num_items(&self) -> usize {
        self.num_items
    }

    fn node_size(&self) -> usize {
        self.node_size
    }

    fn level_bounds(&self) -> &[usize] {
        &self.level_bounds
    }
}

impl<N: IndexableNum> HilbertRTreeIndex<N> for HilbertRTreeRef<'_, N> {
    fn records(&self) -> &[N] {
        self.records
    }

    fn num_items(&self) -> usize {
        self.num_items
    }

    fn node_size(&self) -> usize {
        self.node_size
    }

    fn level_bounds(&self) -> &[usize] {
        &self.level_bounds
    }
}
