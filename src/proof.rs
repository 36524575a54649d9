// Copyright (c) Kanari Network
// SPDX-License-Identifier: Apache-2.0

//! The proof type and its stateless verifier. `verify` touches no store: it
//! recomputes a candidate root from the proof material alone and compares it
//! against the root the caller supplies.

use crate::digest::Digest;
use crate::hash::Hasher;
use crate::node::{LeafNode, Node};
use serde::{Deserialize, Serialize};

/// A membership or non-membership proof for one key against one root.
///
/// `side_nodes` are ordered from the leaf upward: `side_nodes[0]` is the
/// sibling digest adjacent to the leaf, the last entry the one adjacent to
/// the root.
#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
pub struct Proof {
    pub side_nodes: Vec<Digest>,
    /// Empty when the queried path terminated at a placeholder or at a
    /// matching leaf. Otherwise the encoded bytes of the unrelated leaf found
    /// on the query's descent path, proving non-membership by collision.
    pub non_membership_leaf_data: Vec<u8>,
}

impl Proof {
    pub fn new(side_nodes: Vec<Digest>, non_membership_leaf_data: Vec<u8>) -> Self {
        Proof {
            side_nodes,
            non_membership_leaf_data,
        }
    }

    /// Verifies that `(key, value)` is present at `root`, or — when `value`
    /// is empty, the tombstone — that `key` is absent from `root`. Pure: it
    /// never consults a store. Malformed proofs evaluate to `false` rather
    /// than raising.
    pub fn verify<H: Hasher>(&self, hasher: &H, root: &Digest, key: &[u8], value: &[u8]) -> bool {
        let n = hasher.size();
        let depth = n * 8;
        if self.side_nodes.len() > depth {
            return false;
        }
        if self.side_nodes.iter().any(|s| s.len() != n) {
            return false;
        }

        let element_path = hasher.hash(key);

        let mut current_hash = if !value.is_empty() {
            if !self.non_membership_leaf_data.is_empty() {
                return false;
            }
            let leaf = LeafNode {
                path: element_path.clone(),
                value_hash: hasher.hash(value),
            };
            leaf.digest(hasher)
        } else if self.non_membership_leaf_data.is_empty() {
            Digest::placeholder(n)
        } else {
            let other_leaf = match Node::decode(&self.non_membership_leaf_data, n) {
                Ok(Node::Leaf(leaf)) => leaf,
                _ => return false,
            };
            if other_leaf.path == element_path {
                return false;
            }
            if other_leaf.path.common_prefix_len(&element_path) < self.side_nodes.len() {
                return false;
            }
            hasher.hash(&self.non_membership_leaf_data)
        };

        let l = self.side_nodes.len();
        for i in 0..l {
            let bit = element_path.bit(l - 1 - i);
            let sibling = &self.side_nodes[i];
            let mut buf = Vec::with_capacity(2 * n);
            if bit {
                buf.extend_from_slice(sibling.as_slice());
                buf.extend_from_slice(current_hash.as_slice());
            } else {
                buf.extend_from_slice(current_hash.as_slice());
                buf.extend_from_slice(sibling.as_slice());
            }
            current_hash = hasher.hash(&buf);
        }

        &current_hash == root
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hash::Sha256Hasher;
    use crate::tree::SparseMerkleTree;

    #[test]
    fn empty_proof_rejects_wrong_root() {
        let hasher = Sha256Hasher;
        let proof = Proof::new(vec![], vec![]);
        let wrong_root = Digest::from_bytes(vec![1u8; 32]);
        assert!(!proof.verify(&hasher, &wrong_root, b"foo", b""));
    }

    #[test]
    fn membership_proof_rejects_non_membership_leaf_data() {
        let mut tree = SparseMerkleTree::new_in_memory(Sha256Hasher);
        tree.update(b"foo", b"bar".to_vec()).unwrap();
        let mut proof = tree.prove(b"foo").unwrap();
        proof.non_membership_leaf_data = vec![0u8];
        assert!(!proof.verify(&Sha256Hasher, &tree.root(), b"foo", b"bar"));
    }
}
