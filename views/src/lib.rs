//! Typed views over a persistent Merkle backing tree.
//!
//! A view pairs a backing [`Node`](ssz_backing_tree::Node) with the
//! metadata needed to interpret it as a logical collection: fixed-length
//! vectors of packed basic elements, length-mixed lists up to a capacity
//! limit, containers of static fields, and bit-packed lists with a
//! delimiter-bit byte encoding.
//!
//! Views translate logical element indices into generalized-index walks,
//! handle the packing of sub-32-byte elements into shared bottom nodes,
//! and maintain the length mix-in rule for variable-length kinds. Every
//! write goes through the backing tree's copy-on-write path algebra: the
//! view swaps its root handle for the new version and all previously
//! obtained handles stay valid.

#![warn(missing_docs)]

mod basic_vector;
mod bitlist;
mod container;
mod element;
mod error;
mod list;
mod subtree;

pub use basic_vector::{BasicVectorType, BasicVectorView};
pub use bitlist::{
    bitlist_bit_len, bitlist_get_bit, bitlist_set_bit, BitListType, BitListView,
};
pub use container::{ContainerType, ContainerView};
pub use element::BasicElement;
pub use error::ViewError;
pub use list::{BasicListType, BasicListView};
pub use subtree::SubtreeView;
