//! Containers of static, heterogeneous fields.

use ssz_backing_tree::{HashFn, Node, Root};

use crate::{subtree::SubtreeView, ViewError};

/// Descriptor for a container with a fixed number of fields.
///
/// Each field occupies one direct position at depth
/// `ceil(log2(field_count))`; a field's node is the root handle of that
/// field's own subtree, whatever its kind. There is no length mix-in, the
/// field count is part of the type.
#[derive(Debug, Clone, Copy)]
pub struct ContainerType {
    field_count: u64,
}

impl ContainerType {
    /// Descriptor for containers of `field_count` fields.
    ///
    /// A container with no fields is not a meaningful type; zero is a
    /// caller bug and panics.
    pub fn new(field_count: u64) -> Self {
        assert!(field_count > 0, "container must have at least one field");
        ContainerType { field_count }
    }

    /// Number of fields.
    pub fn field_count(&self) -> u64 {
        self.field_count
    }

    /// Depth of the field layer.
    pub fn depth(&self) -> u8 {
        Node::depth_for(self.field_count)
    }

    /// Build a container from one backing node per field, in field order.
    /// Unused positions up to the next power of two pad with zero
    /// subtrees.
    pub fn new_view(&self, fields: &[Node]) -> Result<ContainerView, ViewError> {
        if fields.len() as u64 != self.field_count {
            return Err(ViewError::WrongElementCount {
                expected: self.field_count,
                got: fields.len() as u64,
            });
        }
        let backing = Node::from_nodes(fields, self.depth())?;
        Ok(self.view_from_backing(backing))
    }

    /// Reattach a view to an existing backing root.
    pub fn view_from_backing(&self, backing: Node) -> ContainerView {
        ContainerView {
            subtree: SubtreeView::new(backing, self.depth()),
            field_count: self.field_count,
        }
    }
}

/// A fixed-field container over a backing tree.
///
/// Field access trades in root handles: composite fields hand back the
/// subtree their own typed view can reattach to.
#[derive(Debug, Clone)]
pub struct ContainerView {
    subtree: SubtreeView,
    field_count: u64,
}

impl ContainerView {
    /// Number of fields.
    pub fn field_count(&self) -> u64 {
        self.field_count
    }

    /// Current backing root handle.
    pub fn backing(&self) -> &Node {
        self.subtree.backing()
    }

    /// Canonical root under `hash`: the vector root over the field roots.
    pub fn merkle_root(&self, hash: HashFn) -> Root {
        self.subtree.merkle_root(hash)
    }

    /// Root handle of the field at `index`.
    pub fn field(&self, index: u64) -> Result<Node, ViewError> {
        if index >= self.field_count {
            return Err(ViewError::IndexOutOfBounds {
                index,
                length: self.field_count,
            });
        }
        self.subtree.get(index)
    }

    /// Replace the field at `index` with a new subtree root, swapping the
    /// view to the new version.
    pub fn set_field(&mut self, index: u64, node: Node) -> Result<(), ViewError> {
        if index >= self.field_count {
            return Err(ViewError::IndexOutOfBounds {
                index,
                length: self.field_count,
            });
        }
        self.subtree.set(index, node)
    }
}
