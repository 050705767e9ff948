//! Tree node handles.

use std::sync::Arc;

use crate::{
    commit::Commit,
    error::TreeError,
    hash::{HashFn, Root},
    zero::zero_root,
};

/// A handle into the persistent binary Merkle tree.
///
/// Exactly two variants: a 32-byte leaf, or a shared branch. A leaf is
/// either a packed bottom node or the precomputed root of an all-zero
/// subtree standing in for capacity that was never written. A branch
/// always has both children populated; a one-child branch is not
/// representable.
///
/// Cloning a handle is cheap and shares structure.
#[derive(Debug, Clone)]
pub enum Node {
    /// A 32-byte opaque value.
    Leaf(Root),
    /// A branch over two child nodes.
    Branch(Arc<Commit>),
}

impl Node {
    /// Leaf node holding `value`.
    pub fn leaf(value: Root) -> Node {
        Node::Leaf(value)
    }

    /// Branch node over two children, root cache unset.
    pub fn branch(left: Node, right: Node) -> Node {
        Node::Branch(Arc::new(Commit::new(left, right)))
    }

    /// Summary leaf for an all-zero subtree of `depth`.
    pub fn zero(depth: u8) -> Node {
        Node::Leaf(zero_root(depth))
    }

    /// Fresh empty structure to grow into: a branch whose children are
    /// both zero leaves, root not yet computed.
    pub fn expand() -> Node {
        Node::branch(Node::zero(0), Node::zero(0))
    }

    /// Fully navigable all-zero subtree of `depth`.
    ///
    /// Unlike [`Node::zero`], every level is materialized, so reads and
    /// rebinds below it need no expansion step. Each level shares a single
    /// child instance on both sides, so this allocates `depth + 1` nodes
    /// regardless of capacity.
    pub fn zero_subtree(depth: u8) -> Node {
        if depth == 0 {
            return Node::zero(0);
        }
        let child = Node::zero_subtree(depth - 1);
        Node::branch(child.clone(), child)
    }

    /// `ceil(log2(count))`: the smallest depth whose `2^depth` bottom
    /// positions cover `count` nodes. Zero and one node both fit at
    /// depth 0.
    pub fn depth_for(count: u64) -> u8 {
        if count <= 1 {
            0
        } else {
            (64 - (count - 1).leading_zeros()) as u8
        }
    }

    /// Builds a subtree of `depth` from an ordered run of bottom nodes,
    /// zero-padding the unused trailing capacity.
    ///
    /// The run is partitioned at `2^(depth-1)` and built recursively; a
    /// region the run does not reach at all becomes a single zero-summary
    /// leaf for that region's depth, reproducing canonical zero padding
    /// without materializing empty branches.
    pub fn from_nodes(nodes: &[Node], depth: u8) -> Result<Node, TreeError> {
        if depth < 64 {
            let capacity = 1u64 << depth;
            if nodes.len() as u64 > capacity {
                return Err(TreeError::TooManyNodes {
                    supplied: nodes.len() as u64,
                    capacity,
                    depth,
                });
            }
        }
        Ok(Self::from_nodes_inner(nodes, depth))
    }

    fn from_nodes_inner(nodes: &[Node], depth: u8) -> Node {
        if nodes.is_empty() {
            return Node::zero(depth);
        }
        if depth == 0 {
            return nodes[0].clone();
        }
        let pivot = 1u64 << (depth - 1);
        if nodes.len() as u64 <= pivot {
            Node::branch(
                Self::from_nodes_inner(nodes, depth - 1),
                Node::zero(depth - 1),
            )
        } else {
            Node::branch(
                Self::from_nodes_inner(&nodes[..pivot as usize], depth - 1),
                Self::from_nodes_inner(&nodes[pivot as usize..], depth - 1),
            )
        }
    }

    /// Canonical root of this subtree under `hash`.
    ///
    /// A leaf returns its stored value; a branch returns its cached root
    /// or computes `hash(left, right)` and caches it write-once.
    pub fn merkle_root(&self, hash: HashFn) -> Root {
        match self {
            Node::Leaf(value) => *value,
            Node::Branch(commit) => commit.merkle_root(hash),
        }
    }

    /// The leaf value, or `None` for a branch.
    pub fn leaf_value(&self) -> Option<Root> {
        match self {
            Node::Leaf(value) => Some(*value),
            Node::Branch(_) => None,
        }
    }

    /// Whether this handle is a leaf.
    pub fn is_leaf(&self) -> bool {
        matches!(self, Node::Leaf(_))
    }
}
