use std::fmt;

use thiserror::Error;

/// Errors from tree navigation and construction.
///
/// All variants are recoverable and reported to the caller. States that
/// cannot occur without a bug inside this crate (zero-table overflow) panic
/// instead of surfacing here.
#[derive(Debug, Error)]
pub enum TreeError {
    /// A generalized-index walk could not reach its target.
    #[error("cannot find node at target {target} in depth {depth}: {blocker}")]
    Navigation {
        /// Position below the starting node, in `[0, 2^depth)`.
        target: u64,
        /// Remaining depth at the point of failure.
        depth: u8,
        /// What stopped the walk.
        blocker: NavigationBlocker,
    },
    /// More bottom nodes were supplied than a subtree of this depth holds.
    #[error("{supplied} nodes exceed capacity {capacity} of a depth {depth} subtree")]
    TooManyNodes {
        /// Number of bottom nodes supplied.
        supplied: u64,
        /// `2^depth`, the number of positions available.
        capacity: u64,
        /// Requested subtree depth.
        depth: u8,
    },
}

/// What stopped a generalized-index walk.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavigationBlocker {
    /// The target does not fit in the `2^depth` positions below the node.
    TargetOutOfRange,
    /// A leaf occupies the path while depth remains: either a packed
    /// bottom node or a zero-subtree summary, neither of which can be
    /// descended into.
    OpaqueLeaf,
}

impl fmt::Display for NavigationBlocker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NavigationBlocker::TargetOutOfRange => write!(f, "target beyond subtree capacity"),
            NavigationBlocker::OpaqueLeaf => {
                write!(f, "an opaque leaf occupies the path at this depth")
            }
        }
    }
}
