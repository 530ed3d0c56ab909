//! Transfers between two accounts
//!
//! The debit is staged before the credit. Both land in the same
//! transaction, so the pair is committed together or not at all, and
//! `from.before + to.before == from.after + to.after`.

use crate::{
    balance::BalanceMutator,
    ledger::StateAccess,
    types::{Account, UserId},
    Result,
};
use rust_decimal::Decimal;

/// Accounts after a transfer
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransferOutcome {
    /// Debited account
    pub from: Account,
    /// Credited account
    pub to: Account,
}

/// Moves value between accounts
#[derive(Debug)]
pub struct TransferEngine<'m, 's, S: StateAccess + ?Sized> {
    mutator: &'m mut BalanceMutator<'s, S>,
}

impl<'m, 's, S: StateAccess + ?Sized> TransferEngine<'m, 's, S> {
    /// Engine over an existing mutator
    pub fn new(mutator: &'m mut BalanceMutator<'s, S>) -> Self {
        Self { mutator }
    }

    /// Move `amount` from `from` to `to`
    ///
    /// Sufficient funds are not checked; `from` may end up negative. A
    /// transfer to self nets to zero.
    pub fn transfer(
        &mut self,
        from: &UserId,
        to: &UserId,
        amount: Decimal,
    ) -> Result<TransferOutcome> {
        let debited = self.mutator.debit(from, amount)?;
        let credited = self.mutator.credit(to, amount)?;

        // With from == to the credit read the debited record back
        let debited = if from == to { credited.clone() } else { debited };

        tracing::info!(
            from = %from,
            to = %to,
            %amount,
            "Transfer staged"
        );

        Ok(TransferOutcome {
            from: debited,
            to: credited,
        })
    }

    /// Pay `amount` from `user_id` into the reward pool
    pub fn shopping(
        &mut self,
        user_id: &UserId,
        reward_pool: &UserId,
        amount: Decimal,
    ) -> Result<TransferOutcome> {
        self.transfer(user_id, reward_pool, amount)
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
    fn test_transfer_conserves_value() {
        let ledger = MemoryLedger::new();
        let mut txn = Transaction::begin(&ledger);
        let mut mutator = BalanceMutator::new(&mut txn);
        mutator.credit(&user("alice"), dec!(100)).unwrap();
        mutator.credit(&user("bob"), dec!(5)).unwrap();

        let outcome = TransferEngine::new(&mut mutator)
            .transfer(&user("alice"), &user("bob"), dec!(30))
            .unwrap();

        assert_eq!(outcome.from.balance, dec!(70));
        assert_eq!(outcome.to.balance, dec!(35));
        assert_eq!(outcome.from.balance + outcome.to.balance, dec!(105));
    }

    #[test]
    fn test_overdraft_allowed() {
        let ledger = MemoryLedger::new();
        let mut txn = Transaction::begin(&ledger);
        let mut mutator = BalanceMutator::new(&mut txn);

        let outcome = TransferEngine::new(&mut mutator)
            .transfer(&user("alice"), &user("pool"), dec!(50))
            .unwrap();
        assert_eq!(outcome.from.balance, dec!(-50));
        assert_eq!(outcome.to.balance, dec!(50));
    }

    #[test]
    fn test_transfer_to_self_nets_zero() {
        let ledger = MemoryLedger::new();
        let mut txn = Transaction::begin(&ledger);
        let mut mutator = BalanceMutator::new(&mut txn);
        mutator.credit(&user("alice"), dec!(20)).unwrap();

        let outcome = TransferEngine::new(&mut mutator)
            .transfer(&user("alice"), &user("alice"), dec!(7))
            .unwrap();
        assert_eq!(outcome.from.balance, dec!(20));
        assert_eq!(outcome.to.balance, dec!(20));
    }

    #[test]
    fn test_workflow_types_are_debug() {
        let ledger = MemoryLedger::new();
        let mut txn = Transaction::begin(&ledger);
        let mut mutator = BalanceMutator::new(&mut txn);
        assert!(format!("{:?}", mutator.store()).contains("AccountStore"));
        assert!(format!("{:?}", mutator).contains("BalanceMutator"));

        let engine = TransferEngine::new(&mut mutator);
        assert!(format!("{:?}", engine).contains("TransferEngine"));
    }
}
