//! A static, packed Hilbert R-tree over a single contiguous numeric buffer.
//!
//! Build a [`HilbertRTree`] once from a known number of axis-aligned rectangles, then answer
//! range-overlap queries against it any number of times. The whole index — leaf records, parent
//! records, root last — lives in one `Vec<N>`, with no heap-allocated node objects and no
//! pointers to fix up when the buffer is copied, memory-mapped, or persisted.
//!
//! ### Building
//!
//! Use [`HilbertRTreeBuilder`] to accumulate leaf rectangles, then [`finish`][builder::HilbertRTreeBuilder::finish]
//! to pack them into a [`HilbertRTree`].
//!
//! ### Searching
//!
//! Use [`HilbertRTreeIndex::search`] for an unfiltered range query, or
//! [`HilbertRTreeIndex::search_filtered`] to additionally test each candidate leaf's reference.
//!
//! ### Restoring a persisted buffer
//!
//! [`HilbertRTreeRef::try_new`] borrows a previously finalized index out of an external byte
//! slice with no copy; [`HilbertRTree::from_bytes`] does the same but takes ownership of a copy.
//! Both require the caller to supply the original `num_items` and `node_size` — there is no
//! self-describing header.
//!
//! ### Element types
//!
//! Any type implementing [`IndexableNum`] may serve as the buffer's element width: `f64`
//! (the default), `f32`, and the 16/32-bit integer types. Every coordinate and every stored
//! reference shares this one type.
//!
//! ## Example
//!
//! ```
//! use flatpack_rtree::{HilbertRTreeBuilder, HilbertRTreeIndex, HilbertRTreeRef, HilbertSort};
//!
//! let mut builder = HilbertRTreeBuilder::<f64>::new(3).unwrap();
//! builder.add(0., 0., 2., 2.).unwrap();
//! builder.add(1., 1., 3., 3.).unwrap();
//! builder.add(2., 2., 4., 4.).unwrap();
//! let tree = builder.finish::<HilbertSort>().unwrap();
//!
//! let mut hits = tree.search(0.5, 0.5, 1.5, 1.5);
//! hits.sort_unstable();
//! assert_eq!(hits, vec![0, 1]);
//!
//! let buffer = tree.into_inner();
//! let restored = HilbertRTreeRef::<f64>::from_elements(&buffer, 3, 16).unwrap();
//! assert_eq!(restored.search(0.5, 0.5, 1.5, 1.5), vec![0, 1]);
//! ```

mod builder;
mod constants;
mod error;
mod hilbert;
mod index;
mod num;
mod sort;
mod r#trait;
mod util;

pub use builder::HilbertRTreeBuilder;
pub use constants::DEFAULT_NODE_SIZE;
pub use error::{HilbertTreeError, Result};
pub use hilbert::hilbert;
pub use index::{HilbertRTree, HilbertRTreeRef};
pub use num::IndexableNum;
pub use r#trait::HilbertRTreeIndex;
pub use sort::{HilbertSort, Sort, SortParams};
