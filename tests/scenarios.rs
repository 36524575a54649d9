// Copyright (c) Kanari Network
// SPDX-License-Identifier: Apache-2.0

//! End-to-end scenarios against the public API, exercising the tree the way
//! an external caller would rather than poking at its internals.

use rand::{RngCore, SeedableRng, rngs::StdRng};
use smt::{MemoryStore, NodeStore, Sha256Hasher, SparseMerkleTree, ValueStore};

fn new_tree() -> SparseMerkleTree<MemoryStore, MemoryStore, Sha256Hasher> {
    SparseMerkleTree::new_in_memory(Sha256Hasher)
}

#[test]
fn s1_new_tree_read_and_miss() {
    let mut tree = new_tree();
    tree.update(b"foo", b"bar".to_vec()).unwrap();
    assert_eq!(tree.get(b"foo").unwrap(), b"bar");
    assert!(tree.get(b"baz").unwrap().is_empty());
}

#[test]
fn s2_membership_proof_verifies_and_rejects_wrong_value() {
    let mut tree = new_tree();
    tree.update(b"foo", b"bar".to_vec()).unwrap();
    let root = tree.root();
    let proof = tree.prove(b"foo").unwrap();
    assert!(proof.verify(tree.hasher(), &root, b"foo", b"bar"));
    assert!(!proof.verify(tree.hasher(), &root, b"foo", b"baz"));
}

#[test]
fn s3_non_membership_proof_verifies() {
    let mut tree = new_tree();
    tree.update(b"foo", b"bar".to_vec()).unwrap();
    let root = tree.root();
    let proof = tree.prove(b"baz").unwrap();
    assert!(proof.verify(tree.hasher(), &root, b"baz", b""));
}

#[test]
fn s4_root_is_a_function_of_final_state() {
    let mut tree = new_tree();
    tree.update(b"a", b"1".to_vec()).unwrap();
    tree.update(b"b", b"2".to_vec()).unwrap();
    tree.update(b"a", b"3".to_vec()).unwrap();
    tree.delete(b"b").unwrap();

    assert_eq!(tree.get(b"a").unwrap(), b"3");
    assert!(tree.get(b"b").unwrap().is_empty());

    let mut fresh = new_tree();
    fresh.update(b"a", b"3".to_vec()).unwrap();
    assert_eq!(tree.root(), fresh.root());
}

#[test]
fn s5_insert_one_thousand_then_delete_in_reverse_returns_to_empty() {
    let mut rng = StdRng::seed_from_u64(7);
    let mut keys: Vec<[u8; 16]> = Vec::with_capacity(1000);
    while keys.len() < 1000 {
        let mut k = [0u8; 16];
        rng.fill_bytes(&mut k);
        if !keys.contains(&k) {
            keys.push(k);
        }
    }

    let mut tree = new_tree();
    for (i, k) in keys.iter().enumerate() {
        tree.update(k, (i as u32).to_be_bytes().to_vec()).unwrap();
    }
    assert!(!tree.root().is_placeholder());

    for k in keys.iter().rev() {
        tree.delete(k).unwrap();
    }
    assert!(tree.root().is_placeholder());
}

#[test]
fn s6_export_import_round_trips() {
    let mut tree = new_tree();
    tree.update(b"foo", b"bar".to_vec()).unwrap();
    let root = tree.root();

    let nodes_snapshot = NodeStore::export(tree.nodes()).unwrap();
    let values_snapshot = ValueStore::export(tree.values()).unwrap();
    let restored_nodes = MemoryStore::from_export(&nodes_snapshot).unwrap();
    let restored_values = MemoryStore::from_export(&values_snapshot).unwrap();
    let restored = SparseMerkleTree::import(restored_nodes, restored_values, Sha256Hasher, root.clone());

    assert_eq!(restored.get(b"foo").unwrap(), b"bar");
    assert_eq!(restored.root(), root);
}

mod property {
    use super::*;
    use proptest::prelude::*;
    use std::collections::BTreeMap;

    proptest! {
        #[test]
        fn arbitrary_update_sequences_agree_with_a_reference_map(
            ops in prop::collection::vec(
                (prop::collection::vec(any::<u8>(), 1..8), prop::collection::vec(any::<u8>(), 1..8)),
                1..64,
            )
        ) {
            let mut tree = new_tree();
            let mut model: BTreeMap<Vec<u8>, Vec<u8>> = BTreeMap::new();
            for (key, value) in ops {
                tree.update(&key, value.clone()).unwrap();
                model.insert(key, value);
            }
            for (key, value) in &model {
                prop_assert_eq!(&tree.get(key).unwrap(), value);
                let proof = tree.prove(key).unwrap();
                prop_assert!(proof.verify(tree.hasher(), &tree.root(), key, value));
            }
        }
    }
}
