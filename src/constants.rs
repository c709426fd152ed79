/// Number of numeric slots in one record: `(ref, minX, minY, maxX, maxY)`.
pub(crate) const RECORD_WIDTH: usize = 5;

/// Default branching factor, matching the teacher library and the original flatbush.
pub const DEFAULT_NODE_SIZE: usize = 16;
