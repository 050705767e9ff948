//! Variable-length lists of packed basic elements with a length mix-in.

use std::marker::PhantomData;

use ssz_backing_tree::{HashFn, Node, Root};

use crate::{
    basic_vector::{
        clear_element_slot, pack_elements, read_element, serialize_range, splice_element,
        translate_index,
    },
    element::BasicElement,
    subtree::SubtreeView,
    ViewError,
};

/// Length mix-in leaf: the current element count as a little-endian u64
/// in an otherwise zero 32-byte value.
pub(crate) fn length_leaf(length: u64) -> Node {
    let mut value = [0u8; 32];
    value[..8].copy_from_slice(&length.to_le_bytes());
    Node::leaf(value)
}

/// Decode a length mix-in leaf, rejecting non-leaf nodes and nonzero
/// padding bytes.
pub(crate) fn decode_length_leaf(node: &Node) -> Result<u64, ViewError> {
    let value = node.leaf_value().ok_or(ViewError::MalformedLengthMixin)?;
    if value[8..].iter().any(|b| *b != 0) {
        return Err(ViewError::MalformedLengthMixin);
    }
    let mut buf = [0u8; 8];
    buf.copy_from_slice(&value[..8]);
    Ok(u64::from_le_bytes(buf))
}

/// Descriptor for a variable-length list of packed basic elements, bounded
/// by a maximum capacity.
///
/// The backing root is a branch whose left child is the content subtree
/// shaped for the full capacity and whose right child is the length
/// mix-in leaf, so the collection root is
/// `H(content_root, mix_in_length(len))` by construction.
#[derive(Debug)]
pub struct BasicListType<E: BasicElement> {
    limit: u64,
    _marker: PhantomData<E>,
}

impl<E: BasicElement> Clone for BasicListType<E> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<E: BasicElement> Copy for BasicListType<E> {}

impl<E: BasicElement> BasicListType<E> {
    /// Descriptor for lists of at most `limit` elements.
    pub fn new(limit: u64) -> Self {
        BasicListType {
            limit,
            _marker: PhantomData,
        }
    }

    /// Declared maximum element count.
    pub fn limit(&self) -> u64 {
        self.limit
    }

    /// Depth of the content subtree, shaped for the full capacity.
    pub fn content_depth(&self) -> u8 {
        let per_node = 32 / E::BYTE_LENGTH as u64;
        Node::depth_for(self.limit.div_ceil(per_node))
    }

    /// Backing for an empty list.
    pub fn default_node(&self) -> Node {
        Node::branch(Node::zero_subtree(self.content_depth()), length_leaf(0))
    }

    /// Empty list view.
    pub fn new_view(&self) -> BasicListView<E> {
        BasicListView {
            subtree: SubtreeView::new(self.default_node(), self.content_depth() + 1),
            kind: *self,
            length: 0,
        }
    }

    /// Reattach a view to an existing backing root, reading the current
    /// length from the mix-in leaf.
    pub fn view_from_backing(&self, backing: Node) -> Result<BasicListView<E>, ViewError> {
        let subtree = SubtreeView::new(backing, self.content_depth() + 1);
        let length = decode_length_leaf(&subtree.get_raw(1, 1)?)?;
        if length > self.limit {
            return Err(ViewError::LengthExceedsLimit {
                length,
                limit: self.limit,
            });
        }
        Ok(BasicListView {
            subtree,
            kind: *self,
            length,
        })
    }

    /// Build a list holding `elements`, which must fit the limit.
    pub fn view_from_elements(&self, elements: &[E]) -> Result<BasicListView<E>, ViewError> {
        let length = elements.len() as u64;
        if length > self.limit {
            return Err(ViewError::LengthExceedsLimit {
                length,
                limit: self.limit,
            });
        }
        let bottom = pack_elements(elements);
        let contents = Node::from_nodes(&bottom, self.content_depth())?;
        Ok(BasicListView {
            subtree: SubtreeView::new(
                Node::branch(contents, length_leaf(length)),
                self.content_depth() + 1,
            ),
            kind: *self,
            length,
        })
    }
}

/// A variable-length list of packed basic elements over a backing tree.
///
/// Growing or shrinking the list rewrites both the touched content path
/// and the length mix-in; all other structure is shared with the previous
/// version.
#[derive(Debug)]
pub struct BasicListView<E: BasicElement> {
    subtree: SubtreeView,
    kind: BasicListType<E>,
    length: u64,
}

impl<E: BasicElement> Clone for BasicListView<E> {
    fn clone(&self) -> Self {
        BasicListView {
            subtree: self.subtree.clone(),
            kind: self.kind,
            length: self.length,
        }
    }
}

impl<E: BasicElement> BasicListView<E> {
    /// Current element count.
    pub fn length(&self) -> u64 {
        self.length
    }

    /// Declared maximum element count.
    pub fn limit(&self) -> u64 {
        self.kind.limit()
    }

    /// Current backing root handle.
    pub fn backing(&self) -> &Node {
        self.subtree.backing()
    }

    /// Canonical root under `hash`: `H(content_root, mix_in_length(len))`.
    pub fn merkle_root(&self, hash: HashFn) -> Root {
        self.subtree.merkle_root(hash)
    }

    /// Element at logical index `index`.
    pub fn get(&self, index: u64) -> Result<E, ViewError> {
        if index >= self.length {
            return Err(ViewError::IndexOutOfBounds {
                index,
                length: self.length,
            });
        }
        let (node_index, slot) = translate_index::<E>(index);
        let leaf = self
            .subtree
            .get(node_index)?
            .leaf_value()
            .ok_or(ViewError::NotPackedLeaf { index })?;
        Ok(read_element(&leaf, slot))
    }

    /// Replace the element at `index` within the current length.
    pub fn set(&mut self, index: u64, value: &E) -> Result<(), ViewError> {
        if index >= self.length {
            return Err(ViewError::IndexOutOfBounds {
                index,
                length: self.length,
            });
        }
        self.write_element(index, value)
    }

    /// Append an element, failing once the limit is reached.
    ///
    /// Touches the new element's content path, materializing it on the
    /// first write into a zero-summarized region, and rewrites the length
    /// mix-in.
    pub fn append(&mut self, value: &E) -> Result<(), ViewError> {
        if self.length >= self.kind.limit() {
            return Err(ViewError::LengthExceedsLimit {
                length: self.length.saturating_add(1),
                limit: self.kind.limit(),
            });
        }
        self.write_element(self.length, value)?;
        self.write_length(self.length + 1)
    }

    /// Remove the last element, zeroing its slot so the content subtree
    /// returns to the canonical shape for the shorter list.
    pub fn pop(&mut self) -> Result<E, ViewError> {
        if self.length == 0 {
            return Err(ViewError::PopFromEmpty);
        }
        let index = self.length - 1;
        let value = self.get(index)?;
        let (node_index, slot) = translate_index::<E>(index);
        let leaf = self
            .subtree
            .get_or_zero(node_index)?
            .leaf_value()
            .ok_or(ViewError::NotPackedLeaf { index })?;
        let cleared = clear_element_slot(&leaf, slot, E::BYTE_LENGTH as usize);
        self.subtree.set(node_index, Node::leaf(cleared))?;
        self.write_length(index)?;
        Ok(value)
    }

    /// Byte-exact extraction of elements `[skip, skip + dest.len() / width)`
    /// within the current length.
    pub fn serialize(&self, skip: u64, dest: &mut [u8]) -> Result<(), ViewError> {
        serialize_range::<E>(&self.subtree, self.length, skip, dest)
    }

    /// Full flat encoding of the current elements.
    pub fn to_bytes(&self) -> Result<Vec<u8>, ViewError> {
        let mut out = vec![0u8; (self.length * E::BYTE_LENGTH as u64) as usize];
        self.serialize(0, &mut out)?;
        Ok(out)
    }

    fn write_element(&mut self, index: u64, value: &E) -> Result<(), ViewError> {
        let (node_index, slot) = translate_index::<E>(index);
        let leaf = self
            .subtree
            .get_or_zero(node_index)?
            .leaf_value()
            .ok_or(ViewError::NotPackedLeaf { index })?;
        let updated = splice_element(&leaf, slot, value);
        self.subtree.set(node_index, Node::leaf(updated))
    }

    fn write_length(&mut self, length: u64) -> Result<(), ViewError> {
        self.subtree.set_raw(1, 1, length_leaf(length))?;
        self.length = length;
        Ok(())
    }
}

impl BasicListView<u64> {
    /// Add `delta` to the element at `index`, saturating at the maximum.
    pub fn increase(&mut self, index: u64, delta: u64) -> Result<(), ViewError> {
        let value = self.get(index)?;
        self.set(index, &value.saturating_add(delta))
    }

    /// Subtract `delta` from the element at `index`, clipping at zero.
    /// The clipped value is what gets stored.
    pub fn decrease(&mut self, index: u64, delta: u64) -> Result<(), ViewError> {
        let value = self.get(index)?;
        self.set(index, &value.saturating_sub(delta))
    }
}
