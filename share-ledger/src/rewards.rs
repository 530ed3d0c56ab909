//! Reward distribution for completed shares

use crate::{
    balance::BalanceMutator, config::RewardConfig, ledger::StateAccess, types::UserId, Result,
};
use rust_decimal::Decimal;
use serde::{Serialize, Serializer};

/// Payload returned by `completeShare`: the configured reward amounts
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ShareReceipt {
    /// Amount credited to the sharer
    #[serde(serialize_with = "decimal_as_number")]
    pub share_amount: Decimal,
    /// Amount credited to each listener
    #[serde(serialize_with = "decimal_as_number")]
    pub listen_amount: Decimal,
}

/// Emit a decimal as a bare JSON number (`100`, not `"100"`)
fn decimal_as_number<S: Serializer>(
    value: &Decimal,
    serializer: S,
) -> std::result::Result<S::Ok, S::Error> {
    let number: serde_json::Number = value
        .normalize()
        .to_string()
        .parse()
        .map_err(serde::ser::Error::custom)?;
    number.serialize(serializer)
}

/// Credits share and listen rewards
#[derive(Debug, Clone)]
pub struct RewardDistributor {
    config: RewardConfig,
}

impl RewardDistributor {
    /// Distributor with fixed reward amounts
    pub fn new(config: RewardConfig) -> Self {
        Self { config }
    }

    /// Reward configuration
    pub fn config(&self) -> &RewardConfig {
        &self.config
    }

    /// Credit the sharer, then each listener in order
    ///
    /// A listener named twice is credited twice. The first failure aborts
    /// the remaining credits.
    pub fn complete_share<S: StateAccess + ?Sized>(
        &self,
        mutator: &mut BalanceMutator<'_, S>,
        sharer: &UserId,
        listeners: &[UserId],
    ) -> Result<ShareReceipt> {
        mutator.credit(sharer, self.config.share_reward)?;

        for listener in listeners {
            mutator.credit(listener, self.config.listen_reward)?;
        }

        tracing::info!(
            sharer = %sharer,
            listeners = listeners.len(),
            "Share rewards staged"
        );

        Ok(ShareReceipt {
            share_amount: self.config.share_reward,
            listen_amount: self.config.listen_reward,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ledger::{MemoryLedger, Transaction};
    use rust_decimal_macros::dec;

    fn user(id: &str) -> UserId {
        UserId::new(id).unwrap()
    }

    #[test]
    fn test_receipt_json() {
        let receipt = ShareReceipt {
            share_amount: dec!(100),
            listen_amount: dec!(10.50),
        };
        assert_eq!(
            serde_json::to_string(&receipt).unwrap(),
            r#"{"shareAmount":100,"listenAmount":10.5}"#
        );
    }

    #[test]
    fn test_complete_share_with_custom_rewards() {
        let ledger = MemoryLedger::new();
        let mut txn = Transaction::begin(&ledger);
        let mut mutator = BalanceMutator::new(&mut txn);

        let distributor = RewardDistributor::new(RewardConfig {
            share_reward: dec!(5),
            listen_reward: dec!(1),
            ..RewardConfig::default()
        });

        let receipt = distributor
            .complete_share(&mut mutator, &user("s"), &[user("a"), user("a"), user("b")])
            .unwrap();
        assert_eq!(receipt.share_amount, dec!(5));
        assert_eq!(receipt.listen_amount, dec!(1));

        let store = mutator.store();
        assert_eq!(store.load(&user("s")).unwrap().unwrap().balance, dec!(5));
        assert_eq!(store.load(&user("a")).unwrap().unwrap().balance, dec!(2));
        assert_eq!(store.load(&user("b")).unwrap().unwrap().balance, dec!(1));
    }
}
