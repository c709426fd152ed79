use std::fmt::Debug;

use bytemuck::Pod;
use num_traits::{Bounded, NumCast, Zero};

/// A numeric type that can serve as the element width of a packed Hilbert R-tree buffer.
///
/// Every coordinate and every stored reference (leaf insertion index or parent slot offset)
/// shares this one type, so `N` must be able to round-trip a `usize` slot offset exactly, and
/// be ordered so boxes can be compared. All arithmetic used to derive a Hilbert sort key goes
/// through `as_f64`, not `N`'s own operators, so no arithmetic supertraits are required here.
/// `f64` is the default; `f32` and the 16/32-bit integer types are provided for callers who want
/// a smaller buffer and can bound their coordinate range accordingly.
pub trait IndexableNum:
    Pod + Copy + Clone + Debug + PartialOrd + Bounded + Zero + NumCast + Send + Sync + 'static
{
    /// Size in bytes of one buffer element.
    const BYTES_PER_ELEMENT: usize = std::mem::size_of::<Self>();

    /// Encode a slot offset or insertion index as a reference value.
    ///
    /// Panics if `value` cannot be represented exactly in `Self`; the packed-tree invariants
    /// guarantee this never happens for the reference values this crate writes (see
    /// `IndexableNum`'s doc comment on the `2^53` bound for `f64`).
    fn from_ref(value: usize) -> Self {
        NumCast::from(value).expect("reference value not exactly representable in element type")
    }

    /// Decode a stored reference slot back into a slot offset or insertion index.
    fn to_ref(self) -> usize {
        NumCast::from(self).expect("reference slot does not hold an integral value")
    }

    /// Convert to `f64` for Hilbert-coordinate mapping. Every `IndexableNum` impl is either
    /// already a float or narrow enough to convert losslessly.
    fn as_f64(self) -> f64 {
        NumCast::from(self).expect("element not representable as f64")
    }
}

impl IndexableNum for f32 {}
impl IndexableNum for f64 {}
impl IndexableNum for i16 {}
impl IndexableNum for u16 {}
impl IndexableNum for i32 {}
impl IndexableNum for u32 {}
