// Copyright (c) Kanari Network
// SPDX-License-Identifier: Apache-2.0

//! Error kinds surfaced by the tree engine. The verifier never raises: a
//! malformed or unconvincing proof simply evaluates to `false` (see
//! [`crate::proof`]).

use crate::digest::Digest;
use crate::node::NodeDecodeError;
use crate::store::StoreError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SmtError {
    /// `delete` (or an internal lookup expecting the key to exist) found no
    /// matching leaf.
    #[error("key is absent from the tree")]
    KeyAbsent,

    /// An empty key, or some other argument the operation's contract forbids.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// A node blob read from the node store failed the codec's shape checks.
    #[error(transparent)]
    MalformedNode(#[from] NodeDecodeError),

    /// The backing store surfaced an unexpected failure.
    #[error("store error: {0}")]
    Store(#[source] anyhow::Error),

    /// Descent required a node whose digest is absent from the node store.
    /// This is a broken invariant (see invariant 2 in the crate's
    /// `DESIGN.md`) and is always fatal.
    #[error("invariant violation: node {0} is unreachable from the store")]
    InvariantViolation(Digest),
}

impl SmtError {
    /// Maps a [`StoreError`] encountered while resolving a digest that should
    /// exist in the store into the right `SmtError` variant: a missing entry
    /// is a broken invariant, not an ordinary not-found.
    pub(crate) fn from_node_lookup(key: &Digest, err: StoreError) -> Self {
        match err {
            StoreError::NotFound => SmtError::InvariantViolation(key.clone()),
            StoreError::Backend(e) => SmtError::Store(e),
        }
    }

    pub(crate) fn from_store(err: StoreError) -> Self {
        match err {
            StoreError::NotFound => SmtError::KeyAbsent,
            StoreError::Backend(e) => SmtError::Store(e),
        }
    }
}
