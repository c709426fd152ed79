use thiserror::Error;

/// All errors this crate can produce.
///
/// Every variant is a precondition violation in the sense of §7 of the design spec: a caller
/// mistake to be fixed, not a condition to retry. None of them are raised for malformed
/// coordinate data (NaN, inverted boxes) — those propagate silently per the design's numeric
/// edge case handling.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum HilbertTreeError {
    /// `numItems` must be a positive integer.
    #[error("numItems must be positive, got {0}")]
    InvalidItemCount(usize),

    /// More boxes were added than the builder was constructed to hold.
    #[error("cannot add a {added}th item: builder was constructed for only {num_items} items")]
    TooManyInsertions { added: usize, num_items: usize },

    /// `finish` was called with fewer (or, defensively, more) insertions than `numItems`.
    #[error("added {added} items but finish() expected exactly {expected}")]
    InsertionCountMismatch { added: usize, expected: usize },

    /// A restored buffer's length doesn't match what `(numItems, nodeSize)` predicts.
    #[error("buffer holds {actual} elements but (numItems, nodeSize) implies {expected}")]
    BufferLengthMismatch { expected: usize, actual: usize },

    /// A restored byte buffer's length is not a whole multiple of the element width, so it
    /// cannot be reinterpreted as a slice of `N`.
    #[error("byte buffer of length {0} is not a multiple of the element width")]
    InvalidByteLength(usize),

    /// A restored byte buffer has a valid length but starts at an address not aligned for `N`.
    #[error("byte buffer of length {0} is not aligned for the element type")]
    MisalignedBuffer(usize),
}

/// This crate's `Result` alias.
pub type Result<T> = std::result::Result<T, HilbertTreeError>;
