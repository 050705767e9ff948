//! Bit-packed lists with a delimiter-bit byte encoding.
//!
//! Bits pack eight per byte, 256 per bottom node. The canonical byte
//! encoding appends a single delimiter bit immediately after the last
//! logical bit, so the bit length is recoverable from the highest set bit
//! of the final byte and zero padding can never be confused for content.

use ssz_backing_tree::{HashFn, Node, Root};

use crate::{
    list::{decode_length_leaf, length_leaf},
    subtree::SubtreeView,
    ViewError,
};

const BITS_PER_BOTTOM_NODE: u64 = 256;

/// Bit length of a delimited bitlist encoding.
///
/// The final byte must carry the delimiter bit; an empty buffer or a zero
/// final byte is malformed.
pub fn bitlist_bit_len(bytes: &[u8]) -> Result<u64, ViewError> {
    let last = match bytes.last() {
        Some(byte) => *byte,
        None => {
            return Err(ViewError::MalformedBitlist(
                "empty encoding, delimiter bit missing".to_string(),
            ))
        }
    };
    if last == 0 {
        return Err(ViewError::MalformedBitlist(format!(
            "last byte 0x{} carries no delimiter bit",
            hex::encode([last])
        )));
    }
    let delimiter = 7 - last.leading_zeros() as u64;
    Ok((bytes.len() as u64 - 1) * 8 + delimiter)
}

/// Bit at `index` in a packed byte buffer.
///
/// `index` must be within `bytes`; out-of-range indexing panics.
pub fn bitlist_get_bit(bytes: &[u8], index: u64) -> bool {
    bytes[(index / 8) as usize] & (1 << (index % 8)) != 0
}

/// Set or clear the bit at `index` in a packed byte buffer.
///
/// `index` must be within `bytes`; out-of-range indexing panics.
pub fn bitlist_set_bit(bytes: &mut [u8], index: u64, value: bool) {
    let mask = 1u8 << (index % 8);
    if value {
        bytes[(index / 8) as usize] |= mask;
    } else {
        bytes[(index / 8) as usize] &= !mask;
    }
}

/// Descriptor for a bit-packed list bounded by a maximum bit capacity.
///
/// The backing shape mirrors the element lists: a branch of the bit
/// content subtree, shaped for the full capacity, and the length mix-in
/// leaf holding the current bit count.
#[derive(Debug, Clone, Copy)]
pub struct BitListType {
    limit: u64,
}

impl BitListType {
    /// Descriptor for bitlists of at most `limit` bits.
    pub fn new(limit: u64) -> Self {
        BitListType { limit }
    }

    /// Declared maximum bit count.
    pub fn limit(&self) -> u64 {
        self.limit
    }

    /// Depth of the bit content subtree.
    pub fn content_depth(&self) -> u8 {
        Node::depth_for(self.limit.div_ceil(BITS_PER_BOTTOM_NODE))
    }

    /// Backing for an empty bitlist.
    pub fn default_node(&self) -> Node {
        Node::branch(Node::zero_subtree(self.content_depth()), length_leaf(0))
    }

    /// Empty bitlist view.
    pub fn new_view(&self) -> BitListView {
        BitListView {
            subtree: SubtreeView::new(self.default_node(), self.content_depth() + 1),
            kind: *self,
            bit_len: 0,
        }
    }

    /// Reattach a view to an existing backing root, reading the current
    /// bit count from the mix-in leaf.
    pub fn view_from_backing(&self, backing: Node) -> Result<BitListView, ViewError> {
        let subtree = SubtreeView::new(backing, self.content_depth() + 1);
        let bit_len = decode_length_leaf(&subtree.get_raw(1, 1)?)?;
        if bit_len > self.limit {
            return Err(ViewError::LengthExceedsLimit {
                length: bit_len,
                limit: self.limit,
            });
        }
        Ok(BitListView {
            subtree,
            kind: *self,
            bit_len,
        })
    }

    /// Decode a delimited byte encoding into a view.
    pub fn view_from_bytes(&self, bytes: &[u8]) -> Result<BitListView, ViewError> {
        let bit_len = bitlist_bit_len(bytes)?;
        if bit_len > self.limit {
            return Err(ViewError::LengthExceedsLimit {
                length: bit_len,
                limit: self.limit,
            });
        }
        // Strip the delimiter; any byte the content no longer reaches is
        // dropped entirely.
        let mut content = bytes.to_vec();
        bitlist_set_bit(&mut content, bit_len, false);
        content.truncate(bit_len.div_ceil(8) as usize);

        let bottom: Vec<Node> = content
            .chunks(32)
            .map(|chunk| {
                let mut leaf = [0u8; 32];
                leaf[..chunk.len()].copy_from_slice(chunk);
                Node::leaf(leaf)
            })
            .collect();
        let contents = Node::from_nodes(&bottom, self.content_depth())?;
        Ok(BitListView {
            subtree: SubtreeView::new(
                Node::branch(contents, length_leaf(bit_len)),
                self.content_depth() + 1,
            ),
            kind: *self,
            bit_len,
        })
    }
}

/// A bit-packed list over a backing tree.
///
/// Bits past the current length are kept zero in the content subtree, so
/// shrinking and regrowing the list always lands on the canonical root.
#[derive(Debug, Clone)]
pub struct BitListView {
    subtree: SubtreeView,
    kind: BitListType,
    bit_len: u64,
}

impl BitListView {
    /// Current bit count.
    pub fn bit_len(&self) -> u64 {
        self.bit_len
    }

    /// Declared maximum bit count.
    pub fn limit(&self) -> u64 {
        self.kind.limit()
    }

    /// Current backing root handle.
    pub fn backing(&self) -> &Node {
        self.subtree.backing()
    }

    /// Canonical root under `hash`:
    /// `H(bit_content_root, mix_in_length(bit_len))`.
    pub fn merkle_root(&self, hash: HashFn) -> Root {
        self.subtree.merkle_root(hash)
    }

    /// Bit at logical index `index`.
    pub fn get_bit(&self, index: u64) -> Result<bool, ViewError> {
        if index >= self.bit_len {
            return Err(ViewError::IndexOutOfBounds {
                index,
                length: self.bit_len,
            });
        }
        let node_index = index / BITS_PER_BOTTOM_NODE;
        let leaf = self
            .subtree
            .get(node_index)?
            .leaf_value()
            .ok_or(ViewError::NotPackedLeaf { index })?;
        Ok(bitlist_get_bit(&leaf, index % BITS_PER_BOTTOM_NODE))
    }

    /// Set or clear the bit at `index` within the current length.
    pub fn set_bit(&mut self, index: u64, value: bool) -> Result<(), ViewError> {
        if index >= self.bit_len {
            return Err(ViewError::IndexOutOfBounds {
                index,
                length: self.bit_len,
            });
        }
        self.write_bit(index, value)
    }

    /// Append a bit, failing once the limit is reached.
    pub fn append_bit(&mut self, value: bool) -> Result<(), ViewError> {
        if self.bit_len >= self.kind.limit() {
            return Err(ViewError::LengthExceedsLimit {
                length: self.bit_len.saturating_add(1),
                limit: self.kind.limit(),
            });
        }
        self.write_bit(self.bit_len, value)?;
        self.write_bit_len(self.bit_len + 1)
    }

    /// Remove the last bit, clearing its slot in the content subtree.
    pub fn pop_bit(&mut self) -> Result<bool, ViewError> {
        if self.bit_len == 0 {
            return Err(ViewError::PopFromEmpty);
        }
        let index = self.bit_len - 1;
        let value = self.get_bit(index)?;
        self.write_bit(index, false)?;
        self.write_bit_len(index)?;
        Ok(value)
    }

    /// Canonical delimited byte encoding: `bit_len / 8 + 1` bytes with the
    /// delimiter bit at position `bit_len`.
    pub fn serialize(&self) -> Result<Vec<u8>, ViewError> {
        let mut out = vec![0u8; (self.bit_len / 8 + 1) as usize];
        let content_bytes = self.bit_len.div_ceil(8) as usize;
        let mut copied = 0usize;
        let mut node_index = 0u64;
        while copied < content_bytes {
            let leaf = self
                .subtree
                .get_or_zero(node_index)?
                .leaf_value()
                .ok_or(ViewError::NotPackedLeaf {
                    index: node_index * BITS_PER_BOTTOM_NODE,
                })?;
            let take = 32.min(content_bytes - copied);
            out[copied..copied + take].copy_from_slice(&leaf[..take]);
            copied += take;
            node_index += 1;
        }
        bitlist_set_bit(&mut out, self.bit_len, true);
        Ok(out)
    }

    fn write_bit(&mut self, index: u64, value: bool) -> Result<(), ViewError> {
        let node_index = index / BITS_PER_BOTTOM_NODE;
        let mut leaf = self
            .subtree
            .get_or_zero(node_index)?
            .leaf_value()
            .ok_or(ViewError::NotPackedLeaf { index })?;
        bitlist_set_bit(&mut leaf, index % BITS_PER_BOTTOM_NODE, value);
        self.subtree.set(node_index, Node::leaf(leaf))
    }

    fn write_bit_len(&mut self, bit_len: u64) -> Result<(), ViewError> {
        self.subtree.set_raw(1, 1, length_leaf(bit_len))?;
        self.bit_len = bit_len;
        Ok(())
    }
}
