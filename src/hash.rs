// Copyright (c) Kanari Network
// SPDX-License-Identifier: Apache-2.0

//! The hash adapter consumed by the tree engine and the stateless verifier.
//!
//! Proofs carry no identity of the hash function that produced them, so a
//! prover and a verifier must be configured with the same [`Hasher`].

use crate::digest::Digest;
use bitcoin_hashes::{Hash as _, sha256};

/// Wraps a cryptographic hash function.
pub trait Hasher: Clone + Send + Sync {
    /// The digest length in bytes. The tree depth is `8 * size()` bits.
    fn size(&self) -> usize;

    /// Hashes an arbitrary byte string into a [`Digest`] of length [`Hasher::size`].
    fn hash(&self, data: &[u8]) -> Digest;
}

/// The default adapter: SHA-256, a 32-byte digest and a 256-bit tree depth.
#[derive(Clone, Copy, Debug, Default)]
pub struct Sha256Hasher;

impl Hasher for Sha256Hasher {
    fn size(&self) -> usize {
        32
    }

    fn hash(&self, data: &[u8]) -> Digest {
        Digest::from_bytes(sha256::Hash::hash(data).to_byte_array().to_vec())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sha256_hasher_reports_32_byte_digests() {
        let h = Sha256Hasher;
        assert_eq!(h.size(), 32);
        assert_eq!(h.hash(b"foo").len(), 32);
    }

    #[test]
    fn sha256_hasher_is_deterministic() {
        let h = Sha256Hasher;
        assert_eq!(h.hash(b"foo"), h.hash(b"foo"));
        assert_ne!(h.hash(b"foo"), h.hash(b"bar"));
    }
}
