//! Account store: one encoded [`Account`] per user id

use crate::{
    ledger::StateAccess,
    types::{Account, UserId},
    Result,
};

/// Loads and saves account records through a [`StateAccess`]
#[derive(Debug)]
pub struct AccountStore<'s, S: StateAccess + ?Sized> {
    state: &'s mut S,
}

impl<'s, S: StateAccess + ?Sized> AccountStore<'s, S> {
    /// Wrap the invocation's state
    pub fn new(state: &'s mut S) -> Self {
        Self { state }
    }

    /// Load the account for `user_id`, `None` if it was never initialized
    pub fn load(&self, user_id: &UserId) -> Result<Option<Account>> {
        match self.state.get_state(user_id.as_str())? {
            Some(bytes) => Account::decode(&bytes).map(Some),
            None => Ok(None),
        }
    }

    /// Return the existing account, or create it with a zero balance
    ///
    /// An existing record is returned unchanged and nothing is written.
    pub fn initialize_if_absent(&mut self, user_id: &UserId) -> Result<Account> {
        if let Some(account) = self.load(user_id)? {
            return Ok(account);
        }

        let account = Account::new(user_id.clone());
        self.save(&account)?;

        tracing::info!(user_id = %user_id, "Account initialized");
        Ok(account)
    }

    /// Encode and write `account` under its user id
    pub fn save(&mut self, account: &Account) -> Result<()> {
        let bytes = account.encode()?;
        self.state.put_state(account.user_id.as_str(), bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ledger::{KeyValueLedger, MemoryLedger, Transaction};
    use crate::Error;
    use rust_decimal::Decimal;

    fn user(id: &str) -> UserId {
        UserId::new(id).unwrap()
    }

    #[test]
    fn test_load_absent() {
        let ledger = MemoryLedger::new();
        let mut txn = Transaction::begin(&ledger);
        let store = AccountStore::new(&mut txn);
        assert_eq!(store.load(&user("alice")).unwrap(), None);
    }

    #[test]
    fn test_initialize_is_idempotent() {
        let ledger = MemoryLedger::new();

        let mut txn = Transaction::begin(&ledger);
        let created = AccountStore::new(&mut txn)
            .initialize_if_absent(&user("alice"))
            .unwrap();
        assert_eq!(created.balance, Decimal::ZERO);
        assert_eq!(txn.commit().unwrap(), 1);

        let mut txn = Transaction::begin(&ledger);
        let again = AccountStore::new(&mut txn)
            .initialize_if_absent(&user("alice"))
            .unwrap();
        assert_eq!(again, created);
        assert!(txn.write_set().is_empty());
        assert_eq!(txn.commit().unwrap(), 0);
        assert_eq!(ledger.version(), 1);
    }

    #[test]
    fn test_initialize_keeps_existing_balance() {
        let ledger = MemoryLedger::new();
        ledger
            .put("bob", br#"{"UserId":"bob","Amount":"42"}"#)
            .unwrap();

        let mut txn = Transaction::begin(&ledger);
        let account = AccountStore::new(&mut txn)
            .initialize_if_absent(&user("bob"))
            .unwrap();
        assert_eq!(account.balance, Decimal::from(42));
    }

    #[test]
    fn test_load_corrupt_record() {
        let ledger = MemoryLedger::new();
        ledger.put("carol", b"\xff\x00garbage").unwrap();

        let mut txn = Transaction::begin(&ledger);
        let mut store = AccountStore::new(&mut txn);
        assert!(matches!(store.load(&user("carol")), Err(Error::Decode(_))));
        assert!(matches!(
            store.initialize_if_absent(&user("carol")),
            Err(Error::Decode(_))
        ));
    }
}
