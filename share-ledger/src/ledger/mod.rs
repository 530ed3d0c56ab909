//! Key-value ledger capability and per-invocation transactions
//!
//! The ledger itself only knows `get`, `put` and an atomic multi-key
//! `write_batch`. Invocations never write to it directly: they stage their
//! writes in a [`Transaction`] and commit the whole [`WriteSet`] at once,
//! so a multi-account update either lands completely or not at all.
//!
//! ```text
//!   invocation ──► Transaction ──get (miss)──► KeyValueLedger::get
//!                     │  ▲
//!                put  │  │ get (hit: read-your-writes)
//!                     ▼  │
//!                  WriteSet ──commit──► KeyValueLedger::write_batch
//! ```

mod memory;
#[cfg(feature = "rocksdb")]
mod rocks;

pub use memory::MemoryLedger;
#[cfg(feature = "rocksdb")]
pub use rocks::RocksLedger;

use crate::Result;
use std::collections::BTreeMap;
use uuid::Uuid;

/// Durable key-value store of record
///
/// Implementations report `get` failures as [`crate::Error::LedgerRead`] and
/// `put` / `write_batch` failures as [`crate::Error::LedgerWrite`].
pub trait KeyValueLedger {
    /// Read the value stored under `key`, `None` if absent
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>>;

    /// Write a single key
    fn put(&self, key: &str, value: &[u8]) -> Result<()>;

    /// Apply every entry of `writes` atomically
    fn write_batch(&self, writes: &WriteSet) -> Result<()>;
}

impl<L: KeyValueLedger + ?Sized> KeyValueLedger for &L {
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>> {
        (**self).get(key)
    }

    fn put(&self, key: &str, value: &[u8]) -> Result<()> {
        (**self).put(key, value)
    }

    fn write_batch(&self, writes: &WriteSet) -> Result<()> {
        (**self).write_batch(writes)
    }
}

/// Staged writes of one transaction; last write per key wins
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WriteSet {
    entries: BTreeMap<String, Vec<u8>>,
}

impl WriteSet {
    /// Empty write set
    pub fn new() -> Self {
        Self::default()
    }

    /// Stage `value` under `key`
    pub fn insert(&mut self, key: impl Into<String>, value: Vec<u8>) {
        self.entries.insert(key.into(), value);
    }

    /// Staged value for `key`
    pub fn get(&self, key: &str) -> Option<&[u8]> {
        self.entries.get(key).map(Vec::as_slice)
    }

    /// Number of distinct keys staged
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True if nothing is staged
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate staged entries in key order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[u8])> {
        self.entries
            .iter()
            .map(|(key, value)| (key.as_str(), value.as_slice()))
    }
}

/// Read/write access to ledger state as seen from inside an invocation
pub trait StateAccess {
    /// Read the current value of `key`
    fn get_state(&self, key: &str) -> Result<Option<Vec<u8>>>;

    /// Write `value` under `key`
    fn put_state(&mut self, key: &str, value: Vec<u8>) -> Result<()>;
}

/// One invocation's view of the ledger
///
/// Reads see this transaction's own staged writes first. Nothing reaches the
/// ledger until [`Transaction::commit`]; dropping an uncommitted transaction
/// discards its writes.
#[derive(Debug)]
pub struct Transaction<'l, L: KeyValueLedger + ?Sized> {
    ledger: &'l L,
    tx_id: Uuid,
    writes: WriteSet,
}

impl<'l, L: KeyValueLedger + ?Sized> Transaction<'l, L> {
    /// Begin a transaction with a fresh time-ordered id
    pub fn begin(ledger: &'l L) -> Self {
        Self {
            ledger,
            tx_id: Uuid::now_v7(),
            writes: WriteSet::new(),
        }
    }

    /// Transaction id (also used as a log field)
    pub fn tx_id(&self) -> Uuid {
        self.tx_id
    }

    /// Writes staged so far
    pub fn write_set(&self) -> &WriteSet {
        &self.writes
    }

    /// Commit every staged write in one batch
    ///
    /// Returns the number of keys written. An empty write set performs no
    /// ledger write at all.
    pub fn commit(self) -> Result<usize> {
        if self.writes.is_empty() {
            tracing::debug!(tx_id = %self.tx_id, "Nothing to commit");
            return Ok(0);
        }

        self.ledger.write_batch(&self.writes)?;

        tracing::debug!(
            tx_id = %self.tx_id,
            keys = self.writes.len(),
            "Write set committed"
        );

        Ok(self.writes.len())
    }
}

impl<L: KeyValueLedger + ?Sized> StateAccess for Transaction<'_, L> {
    fn get_state(&self, key: &str) -> Result<Option<Vec<u8>>> {
        if let Some(staged) = self.writes.get(key) {
            return Ok(Some(staged.to_vec()));
        }
        self.ledger.get(key)
    }

    fn put_state(&mut self, key: &str, value: Vec<u8>) -> Result<()> {
        self.writes.insert(key, value);
        Ok(())
    }
}
