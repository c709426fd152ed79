//! The write-only phase: accumulate leaf rectangles, then pack them into a queryable tree.

use crate::constants::{DEFAULT_NODE_SIZE, RECORD_WIDTH};
use crate::error::{HilbertTreeError, Result};
use crate::index::HilbertRTree;
use crate::num::IndexableNum;
use crate::sort::{Sort, SortParams};
use crate::util::compute_tree_shape;

/// Builds a [`HilbertRTree`] from a known number of leaf rectangles.
///
/// Create with [`HilbertRTreeBuilder::new`], call [`add`][Self::add] exactly `num_items` times,
/// then consume the builder with [`finish`][Self::finish]. There is no way to call `add` on a
/// builder that has already been finished: `finish` takes `self` by value, so "insert after
/// finalize" is a compile error rather than a runtime one.
pub struct HilbertRTreeBuilder<N: IndexableNum> {
    records: Vec<N>,
    num_items: usize,
    node_size: usize,
    level_bounds: Vec<usize>,
    added: usize,
    min_x: N,
    min_y: N,
    max_x: N,
    max_y: N,
}

impl<N: IndexableNum> HilbertRTreeBuilder<N> {
    /// Create a builder for `num_items` leaves with the default node size (16).
    pub fn new(num_items: usize) -> Result<Self> {
        Self::new_with_node_size(num_items, DEFAULT_NODE_SIZE)
    }

    /// Create a builder for `num_items` leaves with a given branching factor.
    ///
    /// `node_size` is clamped to a minimum of 2, matching the design's branching-factor floor.
    pub fn new_with_node_size(num_items: usize, node_size: usize) -> Result<Self> {
        if num_items == 0 {
            return Err(HilbertTreeError::InvalidItemCount(num_items));
        }
        let node_size = node_size.max(2);
        let (num_nodes, level_bounds) = compute_tree_shape(num_items, node_size);

        Ok(Self {
            records: vec![N::zero(); RECORD_WIDTH * num_nodes],
            num_items,
            node_size,
            level_bounds,
            added: 0,
            min_x: N::max_value(),
            min_y: N::max_value(),
            max_x: N::min_value(),
            max_y: N::min_value(),
        })
    }

    /// Append one leaf rectangle, returning its insertion index.
    ///
    /// `min_x > max_x` or `min_y > max_y` are not rejected; a caller may pass a point rectangle
    /// (`min == max`). NaN coordinates propagate into the global extrema and yield undefined
    /// query results, matching the design's numeric edge-case handling.
    pub fn add(&mut self, min_x: N, min_y: N, max_x: N, max_y: N) -> Result<usize> {
        if self.added >= self.num_items {
            return Err(HilbertTreeError::TooManyInsertions {
                added: self.added + 1,
                num_items: self.num_items,
            });
        }

        let index = self.added;
        let offset = index * RECORD_WIDTH;
        self.records[offset] = N::from_ref(index);
        self.records[offset + 1] = min_x;
        self.records[offset + 2] = min_y;
        self.records[offset + 3] = max_x;
        self.records[offset + 4] = max_y;

        if min_x < self.min_x {
            self.min_x = min_x;
        }
        if min_y < self.min_y {
            self.min_y = min_y;
        }
        if max_x > self.max_x {
            self.max_x = max_x;
        }
        if max_y > self.max_y {
            self.max_y = max_y;
        }

        self.added += 1;
        Ok(index)
    }

    /// Consume the builder, ordering leaves with `S` and packing parent nodes bottom-up.
    pub fn finish<S: Sort<N>>(mut self) -> Result<HilbertRTree<N>> {
        if self.added != self.num_items {
            return Err(HilbertTreeError::InsertionCountMismatch {
                added: self.added,
                expected: self.num_items,
            });
        }

        // Sorting a single group cannot change which leaves it contains, only their order
        // within it, which is search-irrelevant since every record in a group is scanned
        // regardless of order. Skipping it here is a pure performance optimization.
        if self.num_items > self.node_size {
            let sort_params = SortParams {
                num_items: self.num_items,
                node_size: self.node_size,
                min_x: self.min_x,
                min_y: self.min_y,
                max_x: self.max_x,
                max_y: self.max_y,
            };
            S::sort(&sort_params, &mut self.records[..self.num_items * RECORD_WIDTH]);
        }

        // Pack parent nodes level by level. When there's only one level (a single leaf, or
        // level_bounds has length 1), this loop runs zero times and the lone leaf record
        // doubles as the root.
        let mut pos = self.num_items * RECORD_WIDTH;
        let mut scan = 0;
        for &level_end in &self.level_bounds[..self.level_bounds.len().saturating_sub(1)] {
            while scan < level_end {
                let child_offset = scan;

                let mut node_min_x = self.records[scan + 1];
                let mut node_min_y = self.records[scan + 2];
                let mut node_max_x = self.records[scan + 3];
                let mut node_max_y = self.records[scan + 4];
                scan += RECORD_WIDTH;

                for _ in 1..self.node_size {
                    if scan >= level_end {
                        break;
                    }
                    if self.records[scan + 1] < node_min_x {
                        node_min_x = self.records[scan + 1];
                    }
                    if self.records[scan + 2] < node_min_y {
                        node_min_y = self.records[scan + 2];
                    }
                    if self.records[scan + 3] > node_max_x {
                        node_max_x = self.records[scan + 3];
                    }
                    if self.records[scan + 4] > node_max_y {
                        node_max_y = self.records[scan + 4];
                    }
                    scan += RECORD_WIDTH;
                }

                self.records[pos] = N::from_ref(child_offset);
                self.records[pos + 1] = node_min_x;
                self.records[pos + 2] = node_min_y;
                self.records[pos + 3] = node_max_x;
                self.records[pos + 4] = node_max_y;
                pos += RECORD_WIDTH;
            }
        }
        debug_assert_eq!(pos, self.records.len());

        HilbertRTree::from_elements(self.records, self.num_items, self.node_size)
    }
}
