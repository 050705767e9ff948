use std::sync::Arc;

use assert_matches::assert_matches;

use super::*;

/// Leaf whose first 8 bytes are `i` little-endian.
fn leaf(i: u64) -> Node {
    let mut value = [0u8; 32];
    value[..8].copy_from_slice(&i.to_le_bytes());
    Node::leaf(value)
}

fn root_of(node: &Node) -> Root {
    node.merkle_root(sha256_merge)
}

// ── hashing and zero table ───────────────────────────────────────────

#[test]
fn test_merge_deterministic_and_order_sensitive() {
    let a = [1u8; 32];
    let b = [2u8; 32];
    assert_eq!(sha256_merge(&a, &b), sha256_merge(&a, &b));
    assert_ne!(sha256_merge(&a, &b), sha256_merge(&b, &a));
    assert_ne!(sha256_merge(&a, &b), blake3_merge(&a, &b));
    assert_eq!(blake3_merge(&a, &b), blake3_merge(&a, &b));
}

#[test]
fn test_zero_table_conformance() {
    assert_eq!(zero_root(0), [0u8; 32]);
    // Well-known SHA-256 zero-pair vector.
    assert_eq!(
        hex::encode(zero_root(1)),
        "f5a5fd42d16a20302798ef6ed309979b43003d2320d9f0e8ea9831a92759fb4b"
    );
    assert_eq!(zero_root(2), sha256_merge(&zero_root(1), &zero_root(1)));
    assert_eq!(
        zero_root(MAX_DEPTH),
        sha256_merge(&zero_root(MAX_DEPTH - 1), &zero_root(MAX_DEPTH - 1))
    );
}

#[test]
#[should_panic(expected = "exceeds maximum")]
fn test_zero_table_overflow_panics() {
    zero_root(MAX_DEPTH + 1);
}

// ── branch roots and the write-once cache ────────────────────────────

#[test]
fn test_branch_root_is_hash_of_children() {
    let node = Node::branch(leaf(1), leaf(2));
    let expected = sha256_merge(&root_of(&leaf(1)), &root_of(&leaf(2)));
    assert_eq!(root_of(&node), expected);
    // Second call returns the identical cached value.
    assert_eq!(root_of(&node), expected);
    match &node {
        Node::Branch(commit) => assert!(commit.is_computed()),
        Node::Leaf(_) => unreachable!(),
    }
}

#[test]
fn test_rebind_leaves_original_untouched() {
    let original = Node::branch(leaf(1), leaf(2));
    let before = root_of(&original);

    let commit = match &original {
        Node::Branch(commit) => Arc::clone(commit),
        Node::Leaf(_) => unreachable!(),
    };
    let relinked_left = commit.rebind_left(leaf(7));
    let relinked_right = commit.rebind_right(leaf(8));

    // The fresh branches start with their caches unset; the original keeps
    // its cached root.
    match &relinked_left {
        Node::Branch(c) => assert!(!c.is_computed()),
        Node::Leaf(_) => unreachable!(),
    }
    assert!(commit.is_computed());
    assert_eq!(root_of(&original), before);

    assert_eq!(
        root_of(&relinked_left),
        sha256_merge(&root_of(&leaf(7)), &root_of(&leaf(2)))
    );
    assert_eq!(
        root_of(&relinked_right),
        sha256_merge(&root_of(&leaf(1)), &root_of(&leaf(8)))
    );
}

#[test]
fn test_rebind_shares_untouched_child() {
    let shared = Node::branch(leaf(3), leaf(4));
    let original = Node::branch(shared.clone(), leaf(5));
    let commit = match &original {
        Node::Branch(commit) => Arc::clone(commit),
        Node::Leaf(_) => unreachable!(),
    };
    let updated = commit.rebind_right(leaf(6));
    let updated_commit = match &updated {
        Node::Branch(commit) => Arc::clone(commit),
        Node::Leaf(_) => unreachable!(),
    };
    match (&shared, updated_commit.left()) {
        (Node::Branch(a), Node::Branch(b)) => assert!(Arc::ptr_eq(a, b)),
        _ => panic!("shared child should remain the same branch instance"),
    }
}

#[test]
fn test_concurrent_root_computation_is_stable() {
    let node = Node::branch(
        Node::branch(leaf(1), leaf(2)),
        Node::branch(leaf(3), leaf(4)),
    );
    let expected = sha256_merge(
        &sha256_merge(&root_of(&leaf(1)), &root_of(&leaf(2))),
        &sha256_merge(&root_of(&leaf(3)), &root_of(&leaf(4))),
    );
    std::thread::scope(|scope| {
        let handles: Vec<_> = (0..8)
            .map(|_| {
                let node = node.clone();
                scope.spawn(move || node.merkle_root(sha256_merge))
            })
            .collect();
        for handle in handles {
            assert_eq!(handle.join().unwrap(), expected);
        }
    });
}

#[test]
fn test_expand_is_empty_depth_one_subtree() {
    let node = Node::expand();
    assert_eq!(root_of(&node), zero_root(1));
}

// ── construction from bottom nodes ───────────────────────────────────

#[test]
fn test_depth_for() {
    assert_eq!(Node::depth_for(0), 0);
    assert_eq!(Node::depth_for(1), 0);
    assert_eq!(Node::depth_for(2), 1);
    assert_eq!(Node::depth_for(3), 2);
    assert_eq!(Node::depth_for(4), 2);
    assert_eq!(Node::depth_for(5), 3);
    assert_eq!(Node::depth_for(1024), 10);
    assert_eq!(Node::depth_for(1025), 11);
}

#[test]
fn test_from_nodes_full() {
    let nodes: Vec<Node> = (0..4).map(leaf).collect();
    let tree = Node::from_nodes(&nodes, 2).unwrap();
    let expected = sha256_merge(
        &sha256_merge(&root_of(&nodes[0]), &root_of(&nodes[1])),
        &sha256_merge(&root_of(&nodes[2]), &root_of(&nodes[3])),
    );
    assert_eq!(root_of(&tree), expected);
}

#[test]
fn test_from_nodes_zero_padding() {
    // Three of four positions: the last one pads with the depth-0 zero.
    let nodes: Vec<Node> = (0..3).map(leaf).collect();
    let tree = Node::from_nodes(&nodes, 2).unwrap();
    let expected = sha256_merge(
        &sha256_merge(&root_of(&nodes[0]), &root_of(&nodes[1])),
        &sha256_merge(&root_of(&nodes[2]), &zero_root(0)),
    );
    assert_eq!(root_of(&tree), expected);

    // Two of four: the whole right half collapses to the depth-1 zero.
    let tree = Node::from_nodes(&nodes[..2], 2).unwrap();
    let expected = sha256_merge(
        &sha256_merge(&root_of(&nodes[0]), &root_of(&nodes[1])),
        &zero_root(1),
    );
    assert_eq!(root_of(&tree), expected);

    // No nodes at all: the canonical all-zero root.
    let tree = Node::from_nodes(&[], 2).unwrap();
    assert_eq!(root_of(&tree), zero_root(2));
}

#[test]
fn test_from_nodes_capacity_overflow() {
    let nodes: Vec<Node> = (0..3).map(leaf).collect();
    assert_matches!(
        Node::from_nodes(&nodes, 1),
        Err(TreeError::TooManyNodes {
            supplied: 3,
            capacity: 2,
            depth: 1
        })
    );
}

#[test]
fn test_zero_subtree_matches_zero_table() {
    for depth in 0..=6 {
        assert_eq!(root_of(&Node::zero_subtree(depth)), zero_root(depth));
    }
}

#[test]
fn test_zero_subtree_is_navigable() {
    let tree = Node::zero_subtree(4);
    let node = tree.getter(9, 4).unwrap();
    assert_eq!(node.leaf_value(), Some([0u8; 32]));
}

// ── getter ───────────────────────────────────────────────────────────

#[test]
fn test_getter_reads_positions() {
    let nodes: Vec<Node> = (0..4).map(leaf).collect();
    let tree = Node::from_nodes(&nodes, 2).unwrap();

    // Depth 0 is the node itself.
    assert_eq!(root_of(&tree.getter(0, 0).unwrap()), root_of(&tree));
    // Depth 1 is the immediate children.
    assert_eq!(
        root_of(&tree.getter(0, 1).unwrap()),
        sha256_merge(&root_of(&nodes[0]), &root_of(&nodes[1]))
    );
    // Full depth reaches each bottom node.
    for (i, expected) in nodes.iter().enumerate() {
        let got = tree.getter(i as u64, 2).unwrap();
        assert_eq!(got.leaf_value(), expected.leaf_value());
    }
}

#[test]
fn test_getter_target_out_of_range() {
    let tree = Node::from_nodes(&[leaf(0), leaf(1)], 1).unwrap();
    assert_matches!(
        tree.getter(2, 1),
        Err(TreeError::Navigation {
            target: 2,
            depth: 1,
            blocker: NavigationBlocker::TargetOutOfRange
        })
    );
}

#[test]
fn test_getter_stops_at_summary_leaf() {
    // Only the left half is materialized; the right half is a zero summary.
    let tree = Node::from_nodes(&[leaf(0), leaf(1)], 2).unwrap();
    assert_matches!(
        tree.getter(2, 2),
        Err(TreeError::Navigation {
            blocker: NavigationBlocker::OpaqueLeaf,
            ..
        })
    );
}

// ── setter ───────────────────────────────────────────────────────────

#[test]
fn test_setter_equals_fresh_construction() {
    let depth = 3;
    let nodes: Vec<Node> = (0..8).map(leaf).collect();
    let tree = Node::from_nodes(&nodes, depth).unwrap();
    let before = root_of(&tree);

    for target in 0..8u64 {
        let link = tree.setter(target, depth).unwrap();
        let updated = link(leaf(100 + target));

        let mut fresh = nodes.clone();
        fresh[target as usize] = leaf(100 + target);
        let expected = Node::from_nodes(&fresh, depth).unwrap();

        assert_eq!(root_of(&updated), root_of(&expected));
        // The original version is untouched by every rebind.
        assert_eq!(root_of(&tree), before);
    }
}

#[test]
fn test_setter_shares_untouched_branches() {
    let nodes: Vec<Node> = (0..4).map(leaf).collect();
    let tree = Node::from_nodes(&nodes, 2).unwrap();
    let link = tree.setter(3, 2).unwrap();
    let updated = link(leaf(9));

    // The left half of the old and new versions is the same instance.
    let old_left = tree.getter(0, 1).unwrap();
    let new_left = updated.getter(0, 1).unwrap();
    match (&old_left, &new_left) {
        (Node::Branch(a), Node::Branch(b)) => assert!(Arc::ptr_eq(a, b)),
        _ => panic!("left halves should be shared branch instances"),
    }
}

#[test]
fn test_setter_rejects_summary_leaf() {
    let tree = Node::from_nodes(&[leaf(0), leaf(1)], 2).unwrap();
    assert_matches!(
        tree.setter(3, 2),
        Err(TreeError::Navigation {
            blocker: NavigationBlocker::OpaqueLeaf,
            ..
        })
    );
}

// ── expand_into ──────────────────────────────────────────────────────

#[test]
fn test_expand_into_materializes_summary_leaf() {
    let tree = Node::from_nodes(&[leaf(0), leaf(1)], 2).unwrap();
    let link = tree.expand_into(3, 2).unwrap();
    let updated = link(leaf(9));

    let expected =
        Node::from_nodes(&[leaf(0), leaf(1), Node::zero(0), leaf(9)], 2).unwrap();
    assert_eq!(root_of(&updated), root_of(&expected));
}

#[test]
fn test_expand_into_from_bare_summary() {
    // The whole subtree is a single zero-summary leaf.
    let tree = Node::zero(3);
    let link = tree.expand_into(5, 3).unwrap();
    let updated = link(leaf(9));

    let mut nodes = vec![Node::zero(0); 6];
    nodes[5] = leaf(9);
    let expected = Node::from_nodes(&nodes, 3).unwrap();
    assert_eq!(root_of(&updated), root_of(&expected));
}

#[test]
fn test_expand_into_equals_setter_on_materialized_path() {
    let nodes: Vec<Node> = (0..8).map(leaf).collect();
    let tree = Node::from_nodes(&nodes, 3).unwrap();
    let via_setter = tree.setter(6, 3).unwrap()(leaf(42));
    let via_expand = tree.expand_into(6, 3).unwrap()(leaf(42));
    assert_eq!(root_of(&via_setter), root_of(&via_expand));
}

#[test]
fn test_expand_into_target_out_of_range() {
    let tree = Node::zero(2);
    assert_matches!(
        tree.expand_into(4, 2),
        Err(TreeError::Navigation {
            blocker: NavigationBlocker::TargetOutOfRange,
            ..
        })
    );
}

// ── link composition ─────────────────────────────────────────────────

#[test]
fn test_identity_link() {
    let node = leaf(1);
    assert_eq!(root_of(&identity()(node.clone())), root_of(&node));
}

#[test]
fn test_compose_applies_inner_first() {
    // f wraps the value as a left child, g wraps the result as a right
    // child: compose(f, g)(x) must equal g(f(x)).
    let f: Link = Box::new(|n| Node::branch(n, leaf(1)));
    let g: Link = Box::new(|n| Node::branch(leaf(2), n));
    let composed = compose(f, g);
    let result = composed(leaf(3));

    let expected = Node::branch(leaf(2), Node::branch(leaf(3), leaf(1)));
    assert_eq!(root_of(&result), root_of(&expected));
}

#[test]
fn test_compose_is_associative() {
    let make = || -> (Link, Link, Link) {
        (
            Box::new(|n| Node::branch(n, leaf(1))),
            Box::new(|n| Node::branch(leaf(2), n)),
            Box::new(|n| Node::branch(n, leaf(3))),
        )
    };
    let (f, g, h) = make();
    let left_assoc = compose(compose(f, g), h);
    let (f, g, h) = make();
    let right_assoc = compose(f, compose(g, h));
    assert_eq!(
        root_of(&left_assoc(leaf(4))),
        root_of(&right_assoc(leaf(4)))
    );
}

// ── alternate compression function ───────────────────────────────────

#[test]
fn test_pluggable_hash() {
    let node = Node::branch(leaf(1), leaf(2));
    let expected = blake3_merge(&root_of(&leaf(1)), &root_of(&leaf(2)));
    assert_eq!(node.merkle_root(blake3_merge), expected);

    // The cache is keyed to the instance, not the function: a second call
    // with a different merge returns the first cached value, so callers
    // must keep one function per tree.
    assert_eq!(node.merkle_root(sha256_merge), expected);
}
