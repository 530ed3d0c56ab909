//! Contract entry points
//!
//! Each invocation runs in its own [`Transaction`]: the workflow stages its
//! writes, and the write set is committed only if the whole workflow
//! succeeded. A failure anywhere leaves the ledger exactly as it was.
//!
//! # Example
//!
//! ```
//! use share_ledger::{ledger::MemoryLedger, RewardConfig, ShareContract};
//!
//! # fn main() -> share_ledger::Result<()> {
//! let contract = ShareContract::new(MemoryLedger::new(), RewardConfig::default())?;
//! contract.init()?;
//!
//! contract.invoke("completeShare", &["alice", "bob"])?;
//! let payload = contract.invoke("query", &["alice"])?;
//! assert_eq!(payload, br#"{"UserId":"alice","Amount":"100"}"#);
//! # Ok(())
//! # }
//! ```

use crate::{
    balance::BalanceMutator,
    config::RewardConfig,
    dispatch::{Invocation, Response},
    ledger::{KeyValueLedger, Transaction},
    metrics::Metrics,
    rewards::RewardDistributor,
    store::AccountStore,
    transfer::TransferEngine,
    types::{Account, UserId},
    Error, Result,
};

/// Reward ledger contract over a key-value ledger
pub struct ShareContract<L: KeyValueLedger> {
    ledger: L,
    rewards: RewardDistributor,
    reward_pool: UserId,
    metrics: Metrics,
}

impl<L: KeyValueLedger> std::fmt::Debug for ShareContract<L> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ShareContract")
            .field("rewards", self.rewards.config())
            .finish_non_exhaustive()
    }
}

impl<L: KeyValueLedger> ShareContract<L> {
    /// Contract with the given reward configuration
    pub fn new(ledger: L, rewards: RewardConfig) -> Result<Self> {
        rewards.validate()?;
        let reward_pool = UserId::new(rewards.reward_pool_id.clone())
            .map_err(|e| Error::Config(e.to_string()))?;
        let metrics = Metrics::new()
            .map_err(|e| Error::Config(format!("Failed to register metrics: {}", e)))?;

        Ok(Self {
            ledger,
            rewards: RewardDistributor::new(rewards),
            reward_pool,
            metrics,
        })
    }

    /// Host init hook: make sure the reward pool account exists
    pub fn init(&self) -> Result<()> {
        let mut txn = Transaction::begin(&self.ledger);
        AccountStore::new(&mut txn).initialize_if_absent(&self.reward_pool)?;
        let keys = txn.commit()?;

        tracing::info!(
            reward_pool = %self.reward_pool,
            created = keys > 0,
            "Contract initialized"
        );
        Ok(())
    }

    /// Route `function` with `args` and run it
    pub fn invoke<A: AsRef<str>>(&self, function: &str, args: &[A]) -> Result<Vec<u8>> {
        let label = Invocation::FUNCTIONS
            .iter()
            .copied()
            .find(|known| *known == function)
            .unwrap_or("unknown");

        let result = Invocation::parse(function, args).and_then(|inv| self.execute(&inv));
        match &result {
            Ok(_) => self.metrics.record_invocation(label, "ok"),
            Err(e) => {
                tracing::warn!(function, error = %e, kind = e.kind(), "Invocation failed");
                self.metrics.record_invocation(label, e.kind());
            }
        }
        result
    }

    /// [`ShareContract::invoke`] wrapped in the host response envelope
    pub fn handle<A: AsRef<str>>(&self, function: &str, args: &[A]) -> Response {
        Response::from(self.invoke(function, args))
    }

    /// Run a parsed invocation in one transaction and commit it
    pub fn execute(&self, invocation: &Invocation) -> Result<Vec<u8>> {
        let mut txn = Transaction::begin(&self.ledger);
        let span = tracing::info_span!(
            "invoke",
            function = invocation.function(),
            tx_id = %txn.tx_id()
        );
        let _enter = span.enter();

        let payload = self.apply(&mut txn, invocation)?;
        let keys = txn.commit()?;
        self.metrics.record_commit(keys);

        tracing::info!(keys, "Invocation committed");
        Ok(payload)
    }

    fn apply(&self, txn: &mut Transaction<'_, L>, invocation: &Invocation) -> Result<Vec<u8>> {
        let mut mutator = BalanceMutator::new(txn);

        match invocation {
            Invocation::InitUser { user_id } => {
                mutator.store().initialize_if_absent(user_id)?;
                Ok(Vec::new())
            }
            Invocation::Query { user_id } => {
                let account = mutator.store().initialize_if_absent(user_id)?;
                tracing::debug!(user_id = %user_id, balance = %account.balance, "Query");
                account.encode()
            }
            Invocation::CompleteShare { sharer, listeners } => {
                let receipt = self
                    .rewards
                    .complete_share(&mut mutator, sharer, listeners)?;
                serde_json::to_vec(&receipt).map_err(|e| Error::Encode(e.to_string()))
            }
            Invocation::Shopping { user_id, amount } => {
                TransferEngine::new(&mut mutator).shopping(user_id, &self.reward_pool, *amount)?;
                Ok(Vec::new())
            }
            Invocation::Transfer { from, to, amount } => {
                TransferEngine::new(&mut mutator).transfer(from, to, *amount)?;
                Ok(Vec::new())
            }
        }
    }

    /// Read an account without creating it
    pub fn account(&self, user_id: &UserId) -> Result<Option<Account>> {
        let mut txn = Transaction::begin(&self.ledger);
        let store = AccountStore::new(&mut txn);
        store.load(user_id)
    }

    /// Reward pool account id
    pub fn reward_pool(&self) -> &UserId {
        &self.reward_pool
    }

    /// Reward configuration
    pub fn rewards(&self) -> &RewardConfig {
        self.rewards.config()
    }

    /// Underlying ledger
    pub fn ledger(&self) -> &L {
        &self.ledger
    }

    /// Metrics collector
    pub fn metrics(&self) -> &Metrics {
        &self.metrics
    }
}
