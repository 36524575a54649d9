// Copyright (c) Kanari Network
// SPDX-License-Identifier: Apache-2.0

//! An authenticated key-value map backed by a sparse Merkle tree over the
//! full output space of a pluggable hash function.
//!
//! ```text
//!               root
//!              /    \
//!            ...    ...          every key hashes to one leaf position
//!            /          \        in a tree of depth `8 * hasher.size()`;
//!          leaf      placeholder an absent key's position is a placeholder,
//!        (k => v)                never a materialized node.
//! ```
//!
//! A subtree holding no keys is the placeholder digest; a subtree holding
//! exactly one key is that key's leaf digest, however deep it sits. Only
//! divergence points between two or more keys are ever written to the node
//! store, which keeps the tree at `O(k log k)` stored nodes for `k` keys.
//!
//! [`SparseMerkleTree`] is the entry point. [`Proof`] is produced by
//! [`SparseMerkleTree::prove`] and verified independently of any store via
//! [`Proof::verify`].

mod digest;
mod error;
mod hash;
mod node;
mod path;
mod proof;
mod store;
mod tree;

pub use digest::Digest;
pub use error::SmtError;
pub use hash::{Hasher, Sha256Hasher};
pub use path::depth_bits;
pub use proof::Proof;
pub use store::{MemoryStore, NodeStore, StoreError, ValueStore};
pub use tree::{SparseMerkleTree, MAX_KEY_LEN};
