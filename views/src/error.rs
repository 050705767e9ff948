use ssz_backing_tree::TreeError;
use thiserror::Error;

/// Errors from typed view operations.
#[derive(Debug, Error)]
pub enum ViewError {
    /// A logical index at or past the collection's current length.
    #[error("index {index} out of bounds for length {length}")]
    IndexOutOfBounds {
        /// Requested logical index.
        index: u64,
        /// Current length of the collection.
        length: u64,
    },
    /// A length past the collection's declared capacity.
    #[error("length {length} exceeds limit {limit}")]
    LengthExceedsLimit {
        /// Requested or decoded length.
        length: u64,
        /// Declared maximum capacity.
        limit: u64,
    },
    /// Pop from a collection that holds no elements.
    #[error("cannot pop from an empty collection")]
    PopFromEmpty,
    /// A branch was found where a packed bottom node was required.
    #[error("bottom node for element index {index} is not a packed leaf")]
    NotPackedLeaf {
        /// Logical element index whose bottom node misdecoded.
        index: u64,
    },
    /// The number of supplied elements does not match the declared shape.
    #[error("expected {expected} elements, got {got}")]
    WrongElementCount {
        /// Length the descriptor declares.
        expected: u64,
        /// Number of elements supplied.
        got: u64,
    },
    /// A byte buffer whose size is not a whole number of elements.
    #[error("buffer of {len} bytes is not a multiple of element width {width}")]
    UnalignedBuffer {
        /// Buffer size in bytes.
        len: usize,
        /// Fixed element width in bytes.
        width: u8,
    },
    /// A bitlist byte encoding that cannot be decoded.
    #[error("malformed bitlist encoding: {0}")]
    MalformedBitlist(String),
    /// The right child of a length-mixed backing is not a valid length
    /// leaf.
    #[error("length mix-in is not a little-endian length leaf")]
    MalformedLengthMixin,
    /// A navigation failure surfaced from the backing tree.
    #[error(transparent)]
    Tree(#[from] TreeError),
}
