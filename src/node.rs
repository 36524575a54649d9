// Copyright (c) Kanari Network
// SPDX-License-Identifier: Apache-2.0

//! The two node shapes that make up a tree: [`InnerNode`] and [`LeafNode`], and
//! the codec that parses/serializes them to the bytes actually written to the
//! node store.
//!
//! An inner node is the concatenation of its two child digests, `2 * N` bytes
//! long. A leaf node is the `0x00` byte followed by the stored key's path and
//! the stored value's digest, `1 + 2 * N` bytes long. The leading `0x00`
//! combined with the disjoint lengths keeps leaf digests from ever colliding
//! with inner-node digests; changing this encoding would silently invalidate
//! every proof produced by a prior version of the tree.

use crate::digest::Digest;
use crate::hash::Hasher;
use thiserror::Error;

#[cfg(any(test, feature = "fuzzing"))]
use proptest_derive::Arbitrary;

const LEAF_TAG: u8 = 0x00;

#[derive(Clone, Debug, Eq, PartialEq)]
#[cfg_attr(any(test, feature = "fuzzing"), derive(Arbitrary))]
pub(crate) struct InnerNode {
    pub left: Digest,
    pub right: Digest,
}

impl InnerNode {
    pub fn digest<H: Hasher>(&self, hasher: &H) -> Digest {
        let mut buf = Vec::with_capacity(self.left.len() + self.right.len());
        buf.extend_from_slice(self.left.as_slice());
        buf.extend_from_slice(self.right.as_slice());
        hasher.hash(&buf)
    }

    pub fn encode(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(self.left.len() + self.right.len());
        out.extend_from_slice(self.left.as_slice());
        out.extend_from_slice(self.right.as_slice());
        out
    }
}

#[derive(Clone, Debug, Eq, PartialEq)]
#[cfg_attr(any(test, feature = "fuzzing"), derive(Arbitrary))]
pub(crate) struct LeafNode {
    /// The full path (`H(key)`) of the stored key.
    pub path: Digest,
    /// The digest of the stored value.
    pub value_hash: Digest,
}

impl LeafNode {
    pub fn digest<H: Hasher>(&self, hasher: &H) -> Digest {
        hasher.hash(&self.encode())
    }

    pub fn encode(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(1 + self.path.len() + self.value_hash.len());
        out.push(LEAF_TAG);
        out.extend_from_slice(self.path.as_slice());
        out.extend_from_slice(self.value_hash.as_slice());
        out
    }
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub(crate) enum Node {
    Inner(InnerNode),
    Leaf(LeafNode),
}

impl Node {
    pub fn digest<H: Hasher>(&self, hasher: &H) -> Digest {
        match self {
            Node::Inner(n) => n.digest(hasher),
            Node::Leaf(n) => n.digest(hasher),
        }
    }

    pub fn encode(&self) -> Vec<u8> {
        match self {
            Node::Inner(n) => n.encode(),
            Node::Leaf(n) => n.encode(),
        }
    }

    /// Parses a stored blob into an [`InnerNode`] or [`LeafNode`] given the
    /// digest size `n` in bytes. Rejects blobs whose length or prefix matches
    /// neither shape.
    pub fn decode(data: &[u8], n: usize) -> Result<Node, NodeDecodeError> {
        if data.len() == 2 * n {
            return Ok(Node::Inner(InnerNode {
                left: Digest::from_slice(&data[..n]),
                right: Digest::from_slice(&data[n..]),
            }));
        }
        if data.len() == 1 + 2 * n && data[0] == LEAF_TAG {
            return Ok(Node::Leaf(LeafNode {
                path: Digest::from_slice(&data[1..1 + n]),
                value_hash: Digest::from_slice(&data[1 + n..]),
            }));
        }
        Err(NodeDecodeError::Malformed {
            len: data.len(),
            expected_inner: 2 * n,
            expected_leaf: 1 + 2 * n,
        })
    }

    pub fn is_leaf(&self) -> bool {
        matches!(self, Node::Leaf(_))
    }
}

/// Thrown when a node blob fails the codec's shape checks.
#[derive(Debug, Error, Eq, PartialEq)]
pub enum NodeDecodeError {
    #[error(
        "malformed node: {len} bytes matches neither an inner node ({expected_inner} bytes) \
         nor a leaf ({expected_leaf} bytes)"
    )]
    Malformed {
        len: usize,
        expected_inner: usize,
        expected_leaf: usize,
    },
}
