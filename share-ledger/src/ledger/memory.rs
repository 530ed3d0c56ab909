//! In-memory ledger

use super::{KeyValueLedger, WriteSet};
use crate::Result;
use parking_lot::RwLock;
use std::collections::BTreeMap;

/// Ledger kept in a `BTreeMap` behind a lock
///
/// Every `put` and every non-empty `write_batch` bumps [`MemoryLedger::version`],
/// which lets callers observe whether an operation wrote anything.
#[derive(Debug, Default)]
pub struct MemoryLedger {
    inner: RwLock<Inner>,
}

#[derive(Debug, Default)]
struct Inner {
    state: BTreeMap<String, Vec<u8>>,
    version: u64,
}

impl MemoryLedger {
    /// Empty ledger
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of write operations applied so far
    pub fn version(&self) -> u64 {
        self.inner.read().version
    }

    /// Number of keys stored
    pub fn len(&self) -> usize {
        self.inner.read().state.len()
    }

    /// True if no key is stored
    pub fn is_empty(&self) -> bool {
        self.inner.read().state.is_empty()
    }

    /// Copy of the whole key space
    pub fn snapshot(&self) -> BTreeMap<String, Vec<u8>> {
        self.inner.read().state.clone()
    }
}

impl KeyValueLedger for MemoryLedger {
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>> {
        Ok(self.inner.read().state.get(key).cloned())
    }

    fn put(&self, key: &str, value: &[u8]) -> Result<()> {
        let mut inner = self.inner.write();
        inner.state.insert(key.to_string(), value.to_vec());
        inner.version += 1;
        Ok(())
    }

    fn write_batch(&self, writes: &WriteSet) -> Result<()> {
        if writes.is_empty() {
            return Ok(());
        }

        // Single write guard: readers see all of the batch or none of it
        let mut inner = self.inner.write();
        for (key, value) in writes.iter() {
            inner.state.insert(key.to_string(), value.to_vec());
        }
        inner.version += 1;
        Ok(())
    }
}
