//! Composable subtree rebinds.

use crate::node::Node;

/// A pending rebind: given a replacement node for one fixed position,
/// returns the new root with that position substituted and everything else
/// structurally shared.
pub type Link = Box<dyn Fn(Node) -> Node>;

/// The depth-0 link: the replacement is the root.
pub fn identity() -> Link {
    Box::new(|node| node)
}

/// Chain a deep rebind into its parent: `compose(f, g)(x) = g(f(x))`.
///
/// The inner link applies first, producing the replacement subtree one
/// level down; the outer link then binds that subtree into the parent.
/// Folding these from the bottom node up to the starting node yields a
/// single root-for-leaf substitution. Composition is associative.
pub fn compose(inner: Link, outer: Link) -> Link {
    Box::new(move |node| outer(inner(node)))
}
