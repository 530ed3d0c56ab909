//! Ledger backed by RocksDB
//!
//! # Column Families
//!
//! - `accounts` - One encoded account record per user id (key: user id bytes)

use super::{KeyValueLedger, WriteSet};
use crate::{
    config::RocksDBConfig,
    error::{Error, Result},
    Config,
};
use rocksdb::{ColumnFamily, ColumnFamilyDescriptor, Options, WriteBatch, WriteOptions, DB};
use std::path::Path;
use std::sync::Arc;

/// Column family names
const CF_ACCOUNTS: &str = "accounts";

/// Durable ledger on RocksDB
pub struct RocksLedger {
    db: Arc<DB>,
    sync_writes: bool,
}

impl std::fmt::Debug for RocksLedger {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RocksLedger")
            .field("path", &self.db.path())
            .field("sync_writes", &self.sync_writes)
            .finish()
    }
}

impl RocksLedger {
    /// Open or create the database under `config.data_dir`
    pub fn open(config: &Config) -> Result<Self> {
        Self::open_at(&config.data_dir, &config.rocksdb)
    }

    /// Open or create the database at `path`
    pub fn open_at(path: impl AsRef<Path>, tuning: &RocksDBConfig) -> Result<Self> {
        let path = path.as_ref();

        // Create directory if not exists
        std::fs::create_dir_all(path)?;

        // Database options
        let mut db_opts = Options::default();
        db_opts.create_if_missing(true);
        db_opts.create_missing_column_families(true);

        // Tuning from config
        db_opts.set_write_buffer_size(tuning.write_buffer_size_mb * 1024 * 1024);
        db_opts.set_max_write_buffer_number(tuning.max_write_buffer_number);
        db_opts.set_max_background_jobs(tuning.max_background_jobs);

        if tuning.enable_statistics {
            db_opts.enable_statistics();
        }

        let cf_descriptors = vec![ColumnFamilyDescriptor::new(
            CF_ACCOUNTS,
            Self::cf_options_accounts(),
        )];

        let db = DB::open_cf_descriptors(&db_opts, path, cf_descriptors)
            .map_err(|e| Error::LedgerRead(format!("Failed to open RocksDB: {}", e)))?;

        tracing::info!(path = ?path, "Opened RocksDB ledger");

        Ok(Self {
            db: Arc::new(db),
            sync_writes: tuning.sync_writes,
        })
    }

    fn cf_options_accounts() -> Options {
        let mut opts = Options::default();
        // Account records are small and read on every mutation
        opts.set_compression_type(rocksdb::DBCompressionType::Lz4);
        let mut block_opts = rocksdb::BlockBasedOptions::default();
        block_opts.set_bloom_filter(10.0, false);
        opts.set_block_based_table_factory(&block_opts);
        opts
    }

    fn cf_handle(&self) -> Result<&ColumnFamily> {
        self.db
            .cf_handle(CF_ACCOUNTS)
            .ok_or_else(|| Error::LedgerRead(format!("Column family {} not found", CF_ACCOUNTS)))
    }

    fn write_options(&self) -> WriteOptions {
        let mut opts = WriteOptions::default();
        opts.set_sync(self.sync_writes);
        opts
    }

    /// Close database (graceful shutdown)
    pub fn close(self) -> Result<()> {
        drop(self.db);
        tracing::info!("RocksDB closed gracefully");
        Ok(())
    }
}

impl KeyValueLedger for RocksLedger {
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>> {
        let cf = self.cf_handle()?;
        self.db
            .get_cf(cf, key.as_bytes())
            .map_err(|e| Error::LedgerRead(e.to_string()))
    }

    fn put(&self, key: &str, value: &[u8]) -> Result<()> {
        let cf = self
            .cf_handle()
            .map_err(|e| Error::LedgerWrite(e.to_string()))?;
        self.db
            .put_cf_opt(cf, key.as_bytes(), value, &self.write_options())
            .map_err(|e| Error::LedgerWrite(e.to_string()))
    }

    fn write_batch(&self, writes: &WriteSet) -> Result<()> {
        let cf = self
            .cf_handle()
            .map_err(|e| Error::LedgerWrite(e.to_string()))?;

        let mut batch = WriteBatch::default();
        for (key, value) in writes.iter() {
            batch.put_cf(cf, key.as_bytes(), value);
        }

        // Atomic commit
        self.db
            .write_opt(batch, &self.write_options())
            .map_err(|e| Error::LedgerWrite(e.to_string()))?;

        tracing::debug!(keys = writes.len(), "Write batch applied");
        Ok(())
    }
}
