// Copyright (c) Kanari Network
// SPDX-License-Identifier: Apache-2.0

//! Path arithmetic: deriving a key's bit-path and reasoning about it during
//! descent and proof construction.

use crate::digest::Digest;
use crate::hash::Hasher;

/// Derives the bit-path of a user key: `H(key)`, treated as an `8 * N`-bit
/// string with bit 0 the most-significant bit of the first byte.
pub fn path<H: Hasher>(hasher: &H, key: &[u8]) -> Digest {
    hasher.hash(key)
}

/// The tree depth in bits for a hash of digest size `n` bytes.
pub fn depth_bits(n: usize) -> usize {
    n * 8
}
