//! Pluggable leaf-ordering strategies consulted by the builder before packing parent nodes.
//!
//! `HilbertSort` is the only strategy this crate ships, since the design spec pins the exact
//! Hilbert bit-mixing sequence as part of its contract (§9, Hilbert-curve determinism). The
//! `Sort` trait stays as the extension point the teacher library uses for its own alternate
//! orderings (e.g. sort-tile-recursive), so a different space-filling curve could be added
//! later without touching the builder or searcher.

use crate::constants::RECORD_WIDTH;
use crate::hilbert::hilbert;
use crate::num::IndexableNum;

/// Accumulated bounds and shape the leaf ordering needs to know about.
pub struct SortParams<N: IndexableNum> {
    pub num_items: usize,
    pub node_size: usize,
    pub min_x: N,
    pub min_y: N,
    pub max_x: N,
    pub max_y: N,
}

/// A strategy for ordering leaf records before the builder packs them into parent nodes.
///
/// `records` holds exactly the leaf slice, `5 * num_items` elements wide, laid out as
/// `(ref, minX, minY, maxX, maxY)` per leaf in insertion order; implementations reorder it (and
/// only it) in place.
pub trait Sort<N: IndexableNum> {
    fn sort(params: &SortParams<N>, records: &mut [N]);
}

/// Orders leaves by the Hilbert curve distance of their bounding box center.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HilbertSort;

impl<N: IndexableNum> Sort<N> for HilbertSort {
    fn sort(params: &SortParams<N>, records: &mut [N]) {
        let width = params.max_x.as_f64() - params.min_x.as_f64();
        let height = params.max_y.as_f64() - params.min_y.as_f64();
        let hilbert_max = ((1u32 << 16) - 1) as f64;

        let mut hilbert_values: Vec<u32> = Vec::with_capacity(params.num_items);
        for i in 0..params.num_items {
            let pos = i * RECORD_WIDTH;
            let min_x = records[pos + 1].as_f64();
            let min_y = records[pos + 2].as_f64();
            let max_x = records[pos + 3].as_f64();
            let max_y = records[pos + 4].as_f64();

            let hx = if width == 0.0 {
                0
            } else {
                (hilbert_max * ((min_x + max_x) / 2.0 - params.min_x.as_f64()) / width).floor()
                    as u32
            };
            let hy = if height == 0.0 {
                0
            } else {
                (hilbert_max * ((min_y + max_y) / 2.0 - params.min_y.as_f64()) / height).floor()
                    as u32
            };
            hilbert_values.push(hilbert(hx, hy));
        }

        quicksort(
            &mut hilbert_values,
            records,
            0,
            params.num_items - 1,
            params.node_size,
        );
    }
}

/// In-place Hoare quicksort over the Hilbert keys, co-sorting whole 5-wide records alongside.
///
/// Mirrors the teacher library's own leaf sort: a midpoint-pivot partition that stops
/// recursing once both ends of a span fall in the same node-sized group (since records within
/// one eventual parent group don't need to be ordered relative to each other, only relative to
/// records in other groups).
fn quicksort<N: IndexableNum>(
    values: &mut [u32],
    records: &mut [N],
    left: usize,
    right: usize,
    node_size: usize,
) {
    debug_assert!(left <= right);

    if left / node_size >= right / node_size {
        return;
    }

    let midpoint = (left + right) / 2;
    let pivot = values[midpoint];
    let mut i = left.wrapping_sub(1);
    let mut j = right.wrapping_add(1);

    loop {
        loop {
            i = i.wrapping_add(1);
            if values[i] >= pivot {
                break;
            }
        }
        loop {
            j = j.wrapping_sub(1);
            if values[j] <= pivot {
                break;
            }
        }
        if i >= j {
            break;
        }
        swap(values, records, i, j);
    }

    quicksort(values, records, left, j, node_size);
    quicksort(values, records, j.wrapping_add(1), right, node_size);
}

#[inline]
fn swap<N: IndexableNum>(values: &mut [u32], records: &mut [N], i: usize, j: usize) {
    values.swap(i, j);

    let k = RECORD_WIDTH * i;
    let m = RECORD_WIDTH * j;
    for offset in 0..RECORD_WIDTH {
        records.swap(k + offset, m + offset);
    }
}
