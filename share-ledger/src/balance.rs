//! Balance mutator: load, adjust by a signed delta, store

use crate::{
    ledger::StateAccess,
    store::AccountStore,
    types::{Account, UserId},
    Error, Result,
};
use rust_decimal::Decimal;

/// Adjusts single account balances
///
/// Unknown users are created with a zero balance before the adjustment.
/// No bound is enforced: a debit may take a balance below zero.
#[derive(Debug)]
pub struct BalanceMutator<'s, S: StateAccess + ?Sized> {
    store: AccountStore<'s, S>,
}

impl<'s, S: StateAccess + ?Sized> BalanceMutator<'s, S> {
    /// Mutator over the invocation's state
    pub fn new(state: &'s mut S) -> Self {
        Self {
            store: AccountStore::new(state),
        }
    }

    /// Underlying account store
    pub fn store(&mut self) -> &mut AccountStore<'s, S> {
        &mut self.store
    }

    /// Add `delta` (possibly negative) to the balance of `user_id`
    pub fn adjust_balance(&mut self, user_id: &UserId, delta: Decimal) -> Result<Account> {
        let mut account = self.store.initialize_if_absent(user_id)?;

        let before = account.balance;
        account.balance = before.checked_add(delta).ok_or_else(|| {
            Error::InvalidAmount(format!(
                "balance of {} overflows: {} + {}",
                user_id, before, delta
            ))
        })?;

        self.store.save(&account)?;

        tracing::debug!(
            user_id = %user_id,
            %delta,
            balance = %account.balance,
            "Balance adjusted"
        );

        Ok(account)
    }

    /// Increase the balance of `user_id` by `amount`
    pub fn credit(&mut self, user_id: &UserId, amount: Decimal) -> Result<Account> {
        self.adjust_balance(user_id, amount)
    }

    /// Decrease the balance of `user_id` by `amount`
    pub fn debit(&mut self, user_id: &UserId, amount: Decimal) -> Result<Account> {
        self.adjust_balance(user_id, -amount)
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
    fn test_credit_unknown_user_creates_account() {
        let ledger = MemoryLedger::new();
        let mut txn = Transaction::begin(&ledger);

        let account = BalanceMutator::new(&mut txn)
            .credit(&user("alice"), dec!(100))
            .unwrap();
        assert_eq!(account.balance, dec!(100));

        txn.commit().unwrap();
        let mut txn = Transaction::begin(&ledger);
        let stored = AccountStore::new(&mut txn)
            .load(&user("alice"))
            .unwrap()
            .unwrap();
        assert_eq!(stored.balance, dec!(100));
    }

    #[test]
    fn test_debit_may_go_negative() {
        let ledger = MemoryLedger::new();
        let mut txn = Transaction::begin(&ledger);
        let mut mutator = BalanceMutator::new(&mut txn);

        mutator.credit(&user("bob"), dec!(10)).unwrap();
        let account = mutator.debit(&user("bob"), dec!(25.5)).unwrap();
        assert_eq!(account.balance, dec!(-15.5));
    }

    #[test]
    fn test_repeated_small_credits_are_exact() {
        let ledger = MemoryLedger::new();
        let mut txn = Transaction::begin(&ledger);
        let mut mutator = BalanceMutator::new(&mut txn);

        let mut last = None;
        for _ in 0..10 {
            last = Some(mutator.credit(&user("carol"), dec!(0.1)).unwrap());
        }
        assert_eq!(last.unwrap().balance, dec!(1));
    }

    #[test]
    fn test_overflow_is_rejected() {
        let ledger = MemoryLedger::new();
        let mut txn = Transaction::begin(&ledger);
        let mut mutator = BalanceMutator::new(&mut txn);

        mutator.credit(&user("dave"), Decimal::MAX).unwrap();
        let err = mutator.credit(&user("dave"), dec!(1)).unwrap_err();
        assert!(matches!(err, Error::InvalidAmount(_)));

        let account = mutator.store().load(&user("dave")).unwrap().unwrap();
        assert_eq!(account.balance, Decimal::MAX);
    }
}
