//! Generalized-index navigation.
//!
//! A `(target, depth)` pair addresses one of `2^depth` positions below a
//! node: depth 0 is the node itself, depth 1 its immediate children, and
//! deeper walks branch on `pivot = 2^(depth - 1)`, descending left when
//! `target < pivot` and right with `target & !pivot` otherwise. Callers
//! derive the depth from collection capacity via [`Node::depth_for`]; a
//! mismatched depth surfaces as a navigation error, not silent misreads.

use crate::{
    error::{NavigationBlocker, TreeError},
    link::{self, Link},
    node::Node,
};

fn check_target(target: u64, depth: u8) -> Result<(), TreeError> {
    if depth < 64 && target >= 1u64 << depth {
        return Err(TreeError::Navigation {
            target,
            depth,
            blocker: NavigationBlocker::TargetOutOfRange,
        });
    }
    Ok(())
}

impl Node {
    /// Node at generalized index `(target, depth)` below this one.
    ///
    /// Depth 0 returns the node itself; depth 1 its left or right child.
    /// Fails when the path runs into a leaf with depth remaining, which
    /// signals either capacity that was never materialized or a tree of
    /// unexpected shape.
    pub fn getter(&self, target: u64, depth: u8) -> Result<Node, TreeError> {
        check_target(target, depth)?;
        if depth == 0 {
            return Ok(self.clone());
        }
        let commit = match self {
            Node::Branch(commit) => commit,
            Node::Leaf(_) => {
                return Err(TreeError::Navigation {
                    target,
                    depth,
                    blocker: NavigationBlocker::OpaqueLeaf,
                })
            }
        };
        if depth == 1 {
            return Ok(if target == 0 {
                commit.left().clone()
            } else {
                commit.right().clone()
            });
        }
        let pivot = 1u64 << (depth - 1);
        if target < pivot {
            commit.left().getter(target, depth - 1)
        } else {
            commit.right().getter(target & !pivot, depth - 1)
        }
    }

    /// [`Link`] that substitutes the node at `(target, depth)`.
    ///
    /// Built by walking exactly like [`getter`](Self::getter) while
    /// composing each branch's rebind around the deeper link: applying the
    /// result to a replacement node yields the new root with only the
    /// walked path reallocated. Fails when the path crosses a leaf, since
    /// an opaque node cannot be decomposed for rebinding at this depth.
    pub fn setter(&self, target: u64, depth: u8) -> Result<Link, TreeError> {
        check_target(target, depth)?;
        if depth == 0 {
            return Ok(link::identity());
        }
        let commit = match self {
            Node::Branch(commit) => commit,
            Node::Leaf(_) => {
                return Err(TreeError::Navigation {
                    target,
                    depth,
                    blocker: NavigationBlocker::OpaqueLeaf,
                })
            }
        };
        if depth == 1 {
            return Ok(if target == 0 {
                commit.left_link()
            } else {
                commit.right_link()
            });
        }
        let pivot = 1u64 << (depth - 1);
        if target < pivot {
            let inner = commit.left().setter(target, depth - 1)?;
            Ok(link::compose(inner, commit.left_link()))
        } else {
            let inner = commit.right().setter(target & !pivot, depth - 1)?;
            Ok(link::compose(inner, commit.right_link()))
        }
    }

    /// Like [`setter`](Self::setter), but materializes missing structure.
    ///
    /// Where the path crosses a zero-summary leaf, the minimal branch
    /// structure is synthesized with zero-summary children of the matching
    /// sub-depth before the rebind chain is composed. Used for the first
    /// write into a sparse region; on fully materialized paths it behaves
    /// exactly like `setter`.
    pub fn expand_into(&self, target: u64, depth: u8) -> Result<Link, TreeError> {
        check_target(target, depth)?;
        if depth == 0 {
            return Ok(link::identity());
        }
        let commit = match self {
            Node::Branch(commit) => commit,
            Node::Leaf(_) => {
                let start = Node::branch(Node::zero(depth - 1), Node::zero(depth - 1));
                return start.expand_into(target, depth);
            }
        };
        if depth == 1 {
            return Ok(if target == 0 {
                commit.left_link()
            } else {
                commit.right_link()
            });
        }
        let pivot = 1u64 << (depth - 1);
        if target < pivot {
            let inner = commit.left().expand_into(target, depth - 1)?;
            Ok(link::compose(inner, commit.left_link()))
        } else {
            let inner = commit.right().expand_into(target & !pivot, depth - 1)?;
            Ok(link::compose(inner, commit.right_link()))
        }
    }
}
