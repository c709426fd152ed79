//! The finalized, query-only tree types: an owned buffer and a borrowed reference onto one.

use bytemuck::{try_cast_slice, PodCastError};

use crate::constants::RECORD_WIDTH;
use crate::error::{HilbertTreeError, Result};
use crate::num::IndexableNum;
use crate::util::compute_tree_shape;

/// Map a `bytemuck` slice-cast failure onto the distinction our error taxonomy draws: a byte
/// buffer whose length isn't a whole multiple of the element width, versus one whose length is
/// fine but whose start address isn't aligned for `N`.
fn cast_error(err: PodCastError, len: usize) -> HilbertTreeError {
    match err {
        PodCastError::TargetAlignmentGreaterAndInputNotAligned => {
            HilbertTreeError::MisalignedBuffer(len)
        }
        _ => HilbertTreeError::InvalidByteLength(len),
    }
}

/// Validate that `len` numeric elements is exactly what `(num_items, node_size)` predicts, and
/// return the recomputed tree shape shared by both the owned and borrowed index types.
fn validate_shape(num_items: usize, node_size: usize, len: usize) -> Result<(usize, Vec<usize>)> {
    if num_items == 0 {
        return Err(HilbertTreeError::InvalidItemCount(num_items));
    }
    let node_size = node_size.max(2);
    let (num_nodes, level_bounds) = compute_tree_shape(num_items, node_size);
    let expected = RECORD_WIDTH * num_nodes;
    if len != expected {
        return Err(HilbertTreeError::BufferLengthMismatch {
            expected,
            actual: len,
        });
    }
    Ok((num_nodes, level_bounds))
}

/// An owned, finalized packed Hilbert R-tree.
///
/// Produced by [`HilbertRTreeBuilder::finish`][crate::builder::HilbertRTreeBuilder::finish], or
/// recovered from a previously persisted buffer with [`from_elements`][Self::from_elements] or
/// [`from_bytes`][Self::from_bytes]. Query it through [`HilbertRTreeIndex`][crate::r#trait::HilbertRTreeIndex].
#[derive(Debug, Clone, PartialEq)]
pub struct HilbertRTree<N: IndexableNum> {
    pub(crate) records: Vec<N>,
    pub(crate) num_items: usize,
    pub(crate) node_size: usize,
    pub(crate) level_bounds: Vec<usize>,
}

impl<N: IndexableNum> HilbertRTree<N> {
    /// Wrap an already-finalized buffer of `N` elements.
    ///
    /// `records` must have exactly the length `(num_items, node_size)` predicts; this is the
    /// length a [`HilbertRTreeBuilder`][crate::builder::HilbertRTreeBuilder] for the same
    /// `(num_items, node_size)` would have produced. There is no header to self-describe this,
    /// so a mismatched `num_items` or `node_size` from the one used to build the buffer will be
    /// accepted as long as the *lengths* happen to agree, silently recovering the wrong tree;
    /// callers must supply the true construction parameters.
    pub fn from_elements(records: Vec<N>, num_items: usize, node_size: usize) -> Result<Self> {
        let (_, level_bounds) = validate_shape(num_items, node_size, records.len())?;
        Ok(Self {
            records,
            num_items,
            node_size: node_size.max(2),
            level_bounds,
        })
    }

    /// Recover a tree from raw bytes, copying them into a freshly owned `Vec<N>`.
    pub fn from_bytes(bytes: &[u8], num_items: usize, node_size: usize) -> Result<Self> {
        let records: &[N] =
            try_cast_slice(bytes).map_err(|e| cast_error(e, bytes.len()))?;
        Self::from_elements(records.to_vec(), num_items, node_size)
    }

    /// Consume the tree, returning its underlying buffer.
    pub fn into_inner(self) -> Vec<N> {
        self.records
    }

    /// Borrow this tree as a [`HilbertRTreeRef`] onto its own buffer.
    pub fn as_rtree_ref(&self) -> HilbertRTreeRef<'_, N> {
        HilbertRTreeRef {
            records: &self.records,
            num_items: self.num_items,
            node_size: self.node_size,
            level_bounds: self.level_bounds.clone(),
        }
    }
}

impl<N: IndexableNum> AsRef<[N]> for HilbertRTree<N> {
    fn as_ref(&self) -> &[N] {
        &self.records
    }
}

/// A finalized packed Hilbert R-tree borrowed from an external buffer.
///
/// This is the zero-copy counterpart to [`HilbertRTree`]: no bytes are copied, so restoring a
/// memory-mapped or otherwise externally-owned buffer costs nothing beyond the shape check.
#[derive(Debug, Clone, PartialEq)]
pub struct HilbertRTreeRef<'a, N: IndexableNum> {
    pub(crate) records: &'a [N],
    pub(crate) num_items: usize,
    pub(crate) node_size: usize,
    pub(crate) level_bounds: Vec<usize>,
}

impl<'a, N: IndexableNum> HilbertRTreeRef<'a, N> {
    /// Borrow a tree from a typed slice of exactly the length `(num_items, node_size)` predicts.
    pub fn from_elements(records: &'a [N], num_items: usize, node_size: usize) -> Result<Self> {
        let (_, level_bounds) = validate_shape(num_items, node_size, records.len())?;
        Ok(Self {
            records,
            num_items,
            node_size: node_size.max(2),
            level_bounds,
        })
    }

    /// Borrow a tree from raw bytes, reinterpreting them in place as `&[N]`.
    ///
    /// Fails with [`MisalignedBuffer`][HilbertTreeError::MisalignedBuffer] if `bytes` isn't
    /// properly aligned for `N`, or [`InvalidByteLength`][HilbertTreeError::InvalidByteLength] if
    /// its length isn't a whole multiple of `N`'s size.
    pub fn try_new(bytes: &'a [u8], num_items: usize, node_size: usize) -> Result<Self> {
        let records: &[N] = try_cast_slice(bytes).map_err(|e| cast_error(e, bytes.len()))?;
        Self::from_elements(records, num_items, node_size)
    }
}

impl<N: IndexableNum> AsRef<[N]> for HilbertRTreeRef<'_, N> {
    fn as_ref(&self) -> &[N] {
        self.records
    }
}
