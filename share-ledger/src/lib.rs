//! Share Ledger
//!
//! Reward accounts kept in a key-value ledger: users earn a share reward
//! when they share, listeners earn a listen reward, and shopping pays from a
//! user's balance into the reward pool.
//!
//! # Architecture
//!
//! - **Dispatch**: `(function, args)` is parsed into a typed [`Invocation`]
//! - **Workflows**: reward distribution and transfers, built on the balance mutator
//! - **Balance Mutator**: initialize-if-absent, adjust by a signed delta, save
//! - **Account Store**: JSON account records keyed by user id
//! - **Transaction**: every invocation stages its writes and commits them as
//!   one atomic batch
//!
//! # Invariants
//!
//! - Value conservation: a transfer leaves `from + to` unchanged
//! - Idempotent initialization: an existing account is never rewritten by init
//! - All-or-nothing invocations: a failed invocation writes nothing
//! - Exact arithmetic: balances are decimals, never binary floats

#![forbid(unsafe_code)]
#![warn(
    missing_docs,
    rust_2018_idioms,
    missing_debug_implementations,
    clippy::all
)]

pub mod balance;
pub mod config;
pub mod contract;
pub mod dispatch;
pub mod error;
pub mod ledger;
pub mod metrics;
pub mod rewards;
pub mod store;
pub mod transfer;
pub mod types;

// Re-exports
pub use config::{Config, RewardConfig};
pub use contract::ShareContract;
pub use dispatch::{Invocation, Response, Status};
pub use error::{Error, Result};
pub use ledger::{KeyValueLedger, MemoryLedger, Transaction, WriteSet};
#[cfg(feature = "rocksdb")]
pub use ledger::RocksLedger;
pub use types::{Account, UserId};
