//! Persistent branch nodes.

use std::sync::OnceLock;

use crate::{
    hash::{HashFn, Root},
    link::Link,
    node::Node,
};

/// An immutable `(left, right)` pair with a write-once root cache.
///
/// Producing an updated branch never mutates an existing instance: rebinds
/// allocate a fresh `Commit` that shares the untouched child, so a root
/// cached for one instance stays valid for that instance forever. This is
/// what makes structural sharing across tree versions safe.
#[derive(Debug)]
pub struct Commit {
    cache: OnceLock<Root>,
    left: Node,
    right: Node,
}

impl Commit {
    /// New branch over two children, cache unset.
    pub fn new(left: Node, right: Node) -> Self {
        Commit {
            cache: OnceLock::new(),
            left,
            right,
        }
    }

    /// Left child.
    pub fn left(&self) -> &Node {
        &self.left
    }

    /// Right child.
    pub fn right(&self) -> &Node {
        &self.right
    }

    /// `H(left, right)`, cached after the first computation.
    ///
    /// The cache is set exactly once; concurrent first callers may compute
    /// the same value redundantly, but the stored bytes are written through
    /// an atomic set-if-absent and can never tear.
    pub fn merkle_root(&self, hash: HashFn) -> Root {
        *self.cache.get_or_init(|| {
            hash(
                &self.left.merkle_root(hash),
                &self.right.merkle_root(hash),
            )
        })
    }

    /// Whether the root cache has been populated.
    pub fn is_computed(&self) -> bool {
        self.cache.get().is_some()
    }

    /// New branch with `left` replaced and the right child shared.
    pub fn rebind_left(&self, left: Node) -> Node {
        Node::branch(left, self.right.clone())
    }

    /// New branch with `right` replaced and the left child shared.
    pub fn rebind_right(&self, right: Node) -> Node {
        Node::branch(self.left.clone(), right)
    }

    /// [`rebind_left`](Self::rebind_left) as a [`Link`]: captures the right
    /// child so the rebind can run once deeper links have produced the
    /// replacement left subtree.
    pub(crate) fn left_link(&self) -> Link {
        let right = self.right.clone();
        Box::new(move |left| Node::branch(left, right.clone()))
    }

    /// [`rebind_right`](Self::rebind_right) as a [`Link`].
    pub(crate) fn right_link(&self) -> Link {
        let left = self.left.clone();
        Box::new(move |right| Node::branch(left.clone(), right))
    }
}
