// Copyright (c) Kanari Network
// SPDX-License-Identifier: Apache-2.0

//! The [`SparseMerkleTree`] engine: maintains the root digest and the backing
//! stores, and implements `get`, `update`, `delete`, `prove`, `has`.
//!
//! The tree never materializes a placeholder's children below an empty
//! subtree: a subtree with no keys is represented purely by the placeholder
//! digest, and a subtree with exactly one key collapses to that key's leaf
//! digest, however deep it sits. When a new key collides with an existing
//! leaf's path prefix, inner nodes are materialized from the real descent's
//! stopping depth down to the bit where the two keys diverge — placeholders
//! fill the non-branching child at every intermediate level — and removing
//! a key runs this in reverse, collapsing placeholder-sibling chains back
//! into a single leaf digest. This is the "Libra-style" optimization that
//! keeps the tree at `O(k log k)` stored nodes for `k` keys instead of
//! `O(k * depth)`.

use crate::digest::Digest;
use crate::error::SmtError;
use crate::hash::Hasher;
use crate::node::{InnerNode, LeafNode, Node};
use crate::path;
use crate::proof::Proof;
use crate::store::{MemoryStore, NodeStore, ValueStore};
use tracing::trace;

/// The maximum key length this implementation accepts. 8 KiB comfortably
/// covers every realistic caller while keeping a single descent's hashing
/// cost bounded.
pub const MAX_KEY_LEN: usize = 8192;

/// The result of walking from the root down to either a placeholder or a
/// leaf: the siblings collected along the way (root-to-leaf order) and what
/// was found at the end.
struct Descent {
    /// Sibling digests, shallowest (root-adjacent) first.
    side_nodes: Vec<Digest>,
    end: DescentEnd,
}

enum DescentEnd {
    Placeholder,
    Leaf(LeafNode),
}

/// An authenticated key-value map backed by a sparse Merkle tree.
///
/// Single-writer: a mutation must not overlap another mutation on the same
/// instance. Concurrent reads with no writer are safe provided `NS` and `VS`
/// are; concurrent reads during a write are not, since an in-progress update
/// writes new nodes before publishing the new root.
pub struct SparseMerkleTree<NS, VS, H> {
    nodes: NS,
    values: VS,
    hasher: H,
    root: Digest,
}

impl<H: Hasher> SparseMerkleTree<MemoryStore, MemoryStore, H> {
    /// A tree backed by plain in-memory maps, for tests and prototyping.
    pub fn new_in_memory(hasher: H) -> Self {
        Self::new(MemoryStore::new(), MemoryStore::new(), hasher)
    }
}

impl<NS: NodeStore, VS: ValueStore, H: Hasher> SparseMerkleTree<NS, VS, H> {
    /// Creates an empty tree: `root() == placeholder`.
    pub fn new(nodes: NS, values: VS, hasher: H) -> Self {
        let root = Digest::placeholder(hasher.size());
        Self {
            nodes,
            values,
            hasher,
            root,
        }
    }

    /// Resumes a tree at a previously published root, with stores already
    /// populated (e.g. restored from a caller-owned persistence wrapper).
    pub fn import(nodes: NS, values: VS, hasher: H, root: Digest) -> Self {
        Self {
            nodes,
            values,
            hasher,
            root,
        }
    }

    pub fn root(&self) -> Digest {
        self.root.clone()
    }

    pub fn hasher(&self) -> &H {
        &self.hasher
    }

    /// The backing node store, for a caller-owned persistence wrapper to
    /// snapshot alongside [`SparseMerkleTree::root`].
    pub fn nodes(&self) -> &NS {
        &self.nodes
    }

    /// The backing value store, for a caller-owned persistence wrapper to
    /// snapshot alongside [`SparseMerkleTree::root`].
    pub fn values(&self) -> &VS {
        &self.values
    }

    fn get_node(&self, key: &Digest) -> Result<Node, SmtError> {
        let raw = self
            .nodes
            .get(key)
            .map_err(|e| SmtError::from_node_lookup(key, e))?;
        Ok(Node::decode(&raw, self.hasher.size())?)
    }

    fn write_node(&self, node: &Node) -> Result<Digest, SmtError> {
        let digest = node.digest(&self.hasher);
        self.nodes
            .set(digest.clone(), node.encode())
            .map_err(SmtError::from_store)?;
        Ok(digest)
    }

    fn check_key(key: &[u8]) -> Result<(), SmtError> {
        if key.is_empty() {
            return Err(SmtError::InvalidArgument("key must not be empty".into()));
        }
        if key.len() > MAX_KEY_LEN {
            return Err(SmtError::InvalidArgument(format!(
                "key length {} exceeds the {} byte limit",
                key.len(),
                MAX_KEY_LEN
            )));
        }
        Ok(())
    }

    /// Walks from the root to a placeholder or a leaf along `path`,
    /// collecting the sibling digest at every inner node visited.
    fn descend(&self, path: &Digest) -> Result<Descent, SmtError> {
        let mut side_nodes = Vec::new();
        let mut current = self.root.clone();
        let mut d = 0;
        loop {
            if current.is_placeholder() {
                return Ok(Descent {
                    side_nodes,
                    end: DescentEnd::Placeholder,
                });
            }
            match self.get_node(&current)? {
                Node::Leaf(leaf) => {
                    return Ok(Descent {
                        side_nodes,
                        end: DescentEnd::Leaf(leaf),
                    });
                }
                Node::Inner(inner) => {
                    more_asserts::debug_assert_lt!(d, self.hasher.size() * 8);
                    if path.bit(d) {
                        side_nodes.push(inner.left);
                        current = inner.right;
                    } else {
                        side_nodes.push(inner.right);
                        current = inner.left;
                    }
                    d += 1;
                }
            }
        }
    }

    /// Reads the value stored at `key`, or the tombstone (empty bytes) if
    /// absent.
    pub fn get(&self, key: &[u8]) -> Result<Vec<u8>, SmtError> {
        Self::check_key(key)?;
        let path = path::path(&self.hasher, key);
        match self.descend(&path)?.end {
            DescentEnd::Placeholder => Ok(Vec::new()),
            DescentEnd::Leaf(leaf) if leaf.path == path => self
                .values
                .get(&path)
                .map_err(|e| SmtError::from_node_lookup(&path, e)),
            DescentEnd::Leaf(_) => Ok(Vec::new()),
        }
    }

    /// Equivalent to `get(key) != tombstone`.
    pub fn has(&self, key: &[u8]) -> Result<bool, SmtError> {
        Ok(!self.get(key)?.is_empty())
    }

    /// Combines `child` (the subtree on the branch `key`'s path takes at this
    /// level) with `sibling`, writes the resulting inner node, and returns its
    /// digest.
    fn link(&self, bit: bool, child: Digest, sibling: Digest) -> Result<Digest, SmtError> {
        let (left, right) = if bit { (sibling, child) } else { (child, sibling) };
        self.write_node(&Node::Inner(InnerNode { left, right }))
    }

    /// Inserts or overwrites `key` with `value`. A `value` of `⊥` (the empty
    /// byte string) is reinterpreted as `delete(key)`.
    pub fn update(&mut self, key: &[u8], value: Vec<u8>) -> Result<Digest, SmtError> {
        Self::check_key(key)?;
        if value.is_empty() {
            return self.delete(key);
        }

        let path = path::path(&self.hasher, key);
        let descent = self.descend(&path)?;
        let d = descent.side_nodes.len();

        let value_hash = self.hasher.hash(&value);
        let new_leaf = LeafNode {
            path: path.clone(),
            value_hash,
        };
        let mut current_hash = self.write_node(&Node::Leaf(new_leaf))?;
        self.values
            .set(path.clone(), value)
            .map_err(SmtError::from_store)?;

        if let DescentEnd::Leaf(old_leaf) = descent.end {
            if old_leaf.path != path {
                let old_leaf_digest = old_leaf.digest(&self.hasher);
                let common = old_leaf.path.common_prefix_len(&path);
                trace!(depth = d, common, "splitting leaf on key collision");
                current_hash = self.link(path.bit(common), current_hash, old_leaf_digest)?;
                let n = self.hasher.size();
                for i in (d..common).rev() {
                    current_hash = self.link(path.bit(i), current_hash, Digest::placeholder(n))?;
                }
            }
        }

        for i in (0..d).rev() {
            current_hash = self.link(path.bit(i), current_hash, descent.side_nodes[i].clone())?;
        }

        self.root = current_hash.clone();
        Ok(current_hash)
    }

    /// Removes `key`. Fails with [`SmtError::KeyAbsent`] if it isn't present.
    pub fn delete(&mut self, key: &[u8]) -> Result<Digest, SmtError> {
        Self::check_key(key)?;
        let path = path::path(&self.hasher, key);
        let descent = self.descend(&path)?;

        match descent.end {
            DescentEnd::Placeholder => return Err(SmtError::KeyAbsent),
            DescentEnd::Leaf(ref leaf) if leaf.path != path => return Err(SmtError::KeyAbsent),
            DescentEnd::Leaf(_) => {}
        }

        self.values
            .delete(&path)
            .map_err(|e| SmtError::from_node_lookup(&path, e))?;

        let n = self.hasher.size();
        let side_nodes = descent.side_nodes;
        let mut current_hash = Digest::placeholder(n);
        let mut collapsing = true;

        for i in (0..side_nodes.len()).rev() {
            let sibling = side_nodes[i].clone();
            if collapsing {
                if current_hash.is_placeholder() {
                    if sibling.is_placeholder() {
                        continue;
                    }
                    if self.get_node(&sibling)?.is_leaf() {
                        current_hash = sibling;
                        continue;
                    }
                    collapsing = false;
                    current_hash = self.link(path.bit(i), current_hash, sibling)?;
                    continue;
                }
                if sibling.is_placeholder() {
                    // `current_hash` is a promoted leaf; an empty sibling
                    // doesn't disturb it.
                    continue;
                }
                collapsing = false;
                current_hash = self.link(path.bit(i), current_hash, sibling)?;
                continue;
            }
            current_hash = self.link(path.bit(i), current_hash, sibling)?;
        }

        self.root = current_hash.clone();
        Ok(current_hash)
    }

    /// Produces the membership or non-membership proof for `key` against the
    /// current root.
    pub fn prove(&self, key: &[u8]) -> Result<Proof, SmtError> {
        Self::check_key(key)?;
        let path = path::path(&self.hasher, key);
        let descent = self.descend(&path)?;
        let mut side_nodes = descent.side_nodes;
        side_nodes.reverse();

        let non_membership_leaf_data = match descent.end {
            DescentEnd::Placeholder => Vec::new(),
            DescentEnd::Leaf(leaf) if leaf.path == path => Vec::new(),
            DescentEnd::Leaf(leaf) => leaf.encode(),
        };

        Ok(Proof::new(side_nodes, non_membership_leaf_data))
    }
}
