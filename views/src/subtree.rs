//! Common backing-node plumbing shared by the typed views.

use ssz_backing_tree::{HashFn, NavigationBlocker, Node, Root, TreeError};

use crate::ViewError;

/// A view anchor: a backing root handle plus the depth at which the
/// collection's bottom nodes live.
///
/// The anchor owns its root handle; every write produces a fresh root and
/// replaces the handle, leaving prior versions untouched and shareable.
#[derive(Debug, Clone)]
pub struct SubtreeView {
    backing: Node,
    depth: u8,
}

impl SubtreeView {
    /// Anchor a backing node at `depth`.
    pub fn new(backing: Node, depth: u8) -> Self {
        SubtreeView { backing, depth }
    }

    /// Depth of the bottom-node layer below the backing root.
    pub fn depth(&self) -> u8 {
        self.depth
    }

    /// Current root handle.
    pub fn backing(&self) -> &Node {
        &self.backing
    }

    /// Bottom node at `index`.
    pub fn get(&self, index: u64) -> Result<Node, ViewError> {
        Ok(self.backing.getter(index, self.depth)?)
    }

    /// Bottom node at `index`, reading a zero-summarized region as its
    /// constituent zero leaf.
    ///
    /// Used on read-modify-write paths, where an in-bounds position that
    /// is still summarized holds the default value by definition.
    pub fn get_or_zero(&self, index: u64) -> Result<Node, ViewError> {
        match self.backing.getter(index, self.depth) {
            Ok(node) => Ok(node),
            Err(TreeError::Navigation {
                blocker: NavigationBlocker::OpaqueLeaf,
                ..
            }) => Ok(Node::zero(0)),
            Err(err) => Err(err.into()),
        }
    }

    /// Replace the bottom node at `index`, materializing summarized
    /// structure along the path as needed, and swap in the new root.
    pub fn set(&mut self, index: u64, node: Node) -> Result<(), ViewError> {
        let link = self.backing.expand_into(index, self.depth)?;
        self.backing = link(node);
        Ok(())
    }

    /// Replace the node at an explicit `(target, depth)` path below the
    /// backing root. Used for positions outside the bottom-node layer,
    /// such as a length mix-in leaf.
    pub(crate) fn set_raw(&mut self, target: u64, depth: u8, node: Node) -> Result<(), ViewError> {
        let link = self.backing.setter(target, depth)?;
        self.backing = link(node);
        Ok(())
    }

    /// Read the node at an explicit `(target, depth)` path below the
    /// backing root.
    pub(crate) fn get_raw(&self, target: u64, depth: u8) -> Result<Node, ViewError> {
        Ok(self.backing.getter(target, depth)?)
    }

    /// Canonical root of the backing under `hash`.
    pub fn merkle_root(&self, hash: HashFn) -> Root {
        self.backing.merkle_root(hash)
    }
}
