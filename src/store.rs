// Copyright (c) Kanari Network
// SPDX-License-Identifier: Apache-2.0

//! The storage abstraction the engine consumes: a node store keyed by digest
//! and a value store keyed by path. Production code substitutes a disk- or
//! network-backed implementation; [`MemoryStore`] is the in-memory map tests
//! inject.

use crate::digest::Digest;
use parking_lot::RwLock;
use std::collections::BTreeMap;
use thiserror::Error;

/// An error surfaced by a backing store. `NotFound` is kept distinct from
/// `Backend` so the engine can tell "this key legitimately doesn't exist" from
/// "the store failed unexpectedly".
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("key not found")]
    NotFound,
    #[error(transparent)]
    Backend(#[from] anyhow::Error),
}

/// A key-value store keyed by node digest. The engine never hands it a key
/// that does not start life as the digest of the value it stores.
pub trait NodeStore: Send + Sync {
    fn get(&self, key: &Digest) -> Result<Vec<u8>, StoreError>;
    fn set(&self, key: Digest, value: Vec<u8>) -> Result<(), StoreError>;
    fn delete(&self, key: &Digest) -> Result<(), StoreError>;
    /// An opaque snapshot of the whole store, for a caller-owned persistence
    /// wrapper to bundle alongside the root digest.
    fn export(&self) -> Result<Vec<u8>, StoreError>;
}

/// A key-value store keyed by a key's path (`H(key)`), holding the caller's
/// raw value bytes.
pub trait ValueStore: Send + Sync {
    fn get(&self, path: &Digest) -> Result<Vec<u8>, StoreError>;
    fn set(&self, path: Digest, value: Vec<u8>) -> Result<(), StoreError>;
    fn delete(&self, path: &Digest) -> Result<(), StoreError>;
    fn export(&self) -> Result<Vec<u8>, StoreError>;
}

/// A plain in-memory map, safe for concurrent reads and writes among
/// themselves but offering none of the atomicity guarantees a production
/// store would need across an `update`/`delete` call (see the crate's
/// `DESIGN.md` for the open question this leaves).
#[derive(Default)]
pub struct MemoryStore(RwLock<BTreeMap<Digest, Vec<u8>>>);

impl MemoryStore {
    pub fn new() -> Self {
        Self(RwLock::new(BTreeMap::new()))
    }

    pub fn len(&self) -> usize {
        self.0.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.read().is_empty()
    }

    pub fn from_export(bytes: &[u8]) -> Result<Self, StoreError> {
        let map: BTreeMap<Digest, Vec<u8>> =
            bcs::from_bytes(bytes).map_err(|e| StoreError::Backend(e.into()))?;
        Ok(Self(RwLock::new(map)))
    }
}

macro_rules! impl_map_store {
    ($trait_name:ident) => {
        impl $trait_name for MemoryStore {
            fn get(&self, key: &Digest) -> Result<Vec<u8>, StoreError> {
                self.0
                    .read()
                    .get(key)
                    .cloned()
                    .ok_or(StoreError::NotFound)
            }

            fn set(&self, key: Digest, value: Vec<u8>) -> Result<(), StoreError> {
                self.0.write().insert(key, value);
                Ok(())
            }

            fn delete(&self, key: &Digest) -> Result<(), StoreError> {
                self.0
                    .write()
                    .remove(key)
                    .map(|_| ())
                    .ok_or(StoreError::NotFound)
            }

            fn export(&self) -> Result<Vec<u8>, StoreError> {
                bcs::to_bytes(&*self.0.read()).map_err(|e| StoreError::Backend(e.into()))
            }
        }
    };
}

impl_map_store!(NodeStore);
impl_map_store!(ValueStore);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn export_import_round_trips() {
        let store = MemoryStore::new();
        NodeStore::set(&store, Digest::placeholder(32), b"payload".to_vec()).unwrap();
        let snapshot = NodeStore::export(&store).unwrap();
        let restored = MemoryStore::from_export(&snapshot).unwrap();
        assert_eq!(
            NodeStore::get(&restored, &Digest::placeholder(32)).unwrap(),
            b"payload"
        );
    }

    #[test]
    fn delete_of_missing_key_is_not_found() {
        let store = MemoryStore::new();
        assert!(matches!(
            NodeStore::delete(&store, &Digest::placeholder(32)),
            Err(StoreError::NotFound)
        ));
    }
}
