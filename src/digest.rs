// Copyright (c) Kanari Network
// SPDX-License-Identifier: Apache-2.0

//! The fixed-size opaque identifier produced by a [`Hasher`](crate::hash::Hasher).

use bytes::Bytes;
use serde::{Deserialize, Serialize, de};
use std::fmt;

#[cfg(any(test, feature = "fuzzing"))]
use proptest::prelude::*;

/// An `N`-byte digest, where `N` is whatever the configured hash function emits.
///
/// The all-zero digest of a given length is the *placeholder*: it denotes an
/// empty subtree at any depth and is never written to a node store.
#[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Digest(Bytes);

impl Digest {
    pub fn from_bytes(bytes: Vec<u8>) -> Self {
        Digest(Bytes::from(bytes))
    }

    pub fn from_slice(bytes: &[u8]) -> Self {
        Digest(Bytes::copy_from_slice(bytes))
    }

    /// The all-zero digest of length `n`, denoting an empty subtree.
    pub fn placeholder(n: usize) -> Self {
        Digest(Bytes::from(vec![0u8; n]))
    }

    pub fn is_placeholder(&self) -> bool {
        self.0.iter().all(|b| *b == 0)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn as_slice(&self) -> &[u8] {
        &self.0
    }

    pub fn to_vec(&self) -> Vec<u8> {
        self.0.to_vec()
    }

    /// Bit `i`, `i` counted from the most-significant bit of the first byte.
    pub fn bit(&self, i: usize) -> bool {
        let byte = self.0[i / 8];
        (byte >> (7 - (i % 8))) & 1 == 1
    }

    /// The number of leading bits `self` and `other` have in common, capped at
    /// the shorter of the two digest's bit lengths.
    pub fn common_prefix_len(&self, other: &Digest) -> usize {
        let bits = self.len().min(other.len()) * 8;
        for i in 0..bits {
            if self.bit(i) != other.bit(i) {
                return i;
            }
        }
        bits
    }
}

impl fmt::Debug for Digest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", hex::encode(&self.0))
    }
}

impl fmt::Display for Digest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", hex::encode(&self.0))
    }
}

impl AsRef<[u8]> for Digest {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl Serialize for Digest {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_bytes(&self.0)
    }
}

impl<'de> Deserialize<'de> for Digest {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let raw = <Vec<u8>>::deserialize(deserializer).map_err(de::Error::custom)?;
        Ok(Digest::from_bytes(raw))
    }
}

/// Generates 32-byte digests, matching [`crate::hash::Sha256Hasher`] — the
/// one concrete [`crate::hash::Hasher`] this crate ships.
#[cfg(any(test, feature = "fuzzing"))]
impl Arbitrary for Digest {
    type Parameters = ();
    type Strategy = BoxedStrategy<Digest>;

    fn arbitrary_with(_: ()) -> Self::Strategy {
        proptest::collection::vec(any::<u8>(), 32)
            .prop_map(Digest::from_bytes)
            .boxed()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn placeholder_is_all_zero() {
        let p = Digest::placeholder(32);
        assert!(p.is_placeholder());
        assert_eq!(p.len(), 32);
    }

    #[test]
    fn bit_reads_msb_first() {
        let d = Digest::from_bytes(vec![0b1000_0000, 0x00]);
        assert!(d.bit(0));
        assert!(!d.bit(1));
        assert!(!d.bit(7));
        assert!(!d.bit(8));
    }

    #[test]
    fn common_prefix_len_counts_matching_bits() {
        let a = Digest::from_bytes(vec![0b1111_0000]);
        let b = Digest::from_bytes(vec![0b1111_1000]);
        assert_eq!(a.common_prefix_len(&b), 4);
        assert_eq!(a.common_prefix_len(&a), 8);
    }
}
