//! Core types for the share ledger
//!
//! All types are designed for:
//! - Exact arithmetic (Decimal for balances)
//! - A stable on-ledger JSON layout (`{"UserId": .., "Amount": ..}`)

use crate::{Error, Result};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

/// User identifier, also the ledger key of the user's account
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(String);

impl UserId {
    /// Create a user id, rejecting the empty string
    pub fn new(id: impl Into<String>) -> Result<Self> {
        let id = id.into();
        if id.is_empty() {
            return Err(Error::InvalidUserId("user id must not be empty".to_string()));
        }
        Ok(Self(id))
    }

    /// Get as string
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A user's persisted balance record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Account {
    /// Owner, and the record's ledger key
    #[serde(rename = "UserId")]
    pub user_id: UserId,

    /// Current balance; may be negative
    #[serde(rename = "Amount")]
    pub balance: Decimal,
}

impl Account {
    /// Fresh account with a zero balance
    pub fn new(user_id: UserId) -> Self {
        Self {
            user_id,
            balance: Decimal::ZERO,
        }
    }

    /// Encode to the ledger representation
    pub fn encode(&self) -> Result<Vec<u8>> {
        serde_json::to_vec(self).map_err(|e| Error::Encode(e.to_string()))
    }

    /// Decode from the ledger representation
    ///
    /// `Amount` may be a decimal string or a JSON number.
    pub fn decode(bytes: &[u8]) -> Result<Self> {
        let account: Account =
            serde_json::from_slice(bytes).map_err(|e| Error::Decode(e.to_string()))?;
        if account.user_id.as_str().is_empty() {
            return Err(Error::Decode("record has an empty UserId".to_string()));
        }
        Ok(account)
    }
}

/// Parse caller-supplied amount text
///
/// Accepts plain decimals (`"50"`, `"-12.75"`) and scientific notation
/// (`"1e2"`). Digit separators are rejected, and so is any value that
/// cannot be held without rounding.
pub fn parse_amount(text: &str) -> Result<Decimal> {
    let invalid = || Error::InvalidAmount(format!("{:?} is not a number", text));
    if text.contains('_') {
        return Err(invalid());
    }

    match text.find(|c| c == 'e' || c == 'E') {
        Some(index) => {
            // Mantissa must be exact; the exponent shift errors past 28 places
            Decimal::from_str_exact(&text[..index]).map_err(|_| invalid())?;
            Decimal::from_scientific(text).map_err(|_| invalid())
        }
        None => Decimal::from_str_exact(text).map_err(|_| invalid()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_user_id_rejects_empty() {
        assert!(matches!(UserId::new(""), Err(Error::InvalidUserId(_))));
        assert_eq!(UserId::new("alice").unwrap().as_str(), "alice");
    }

    #[test]
    fn test_encode_layout() {
        let mut account = Account::new(UserId::new("alice").unwrap());
        account.balance = dec!(110.5);

        let bytes = account.encode().unwrap();
        let value: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(value["UserId"], "alice");
        assert_eq!(value["Amount"], "110.5");
    }

    #[test]
    fn test_decode_legacy_float_record() {
        let account = Account::decode(br#"{"UserId":"bob","Amount":90}"#).unwrap();
        assert_eq!(account.user_id.as_str(), "bob");
        assert_eq!(account.balance, dec!(90));

        let account = Account::decode(br#"{"UserId":"bob","Amount":-12.5}"#).unwrap();
        assert_eq!(account.balance, dec!(-12.5));
    }

    #[test]
    fn test_decode_malformed() {
        assert!(matches!(Account::decode(b"not json"), Err(Error::Decode(_))));
        assert!(matches!(
            Account::decode(br#"{"UserId":"bob"}"#),
            Err(Error::Decode(_))
        ));
        assert!(matches!(
            Account::decode(br#"{"UserId":"","Amount":"1"}"#),
            Err(Error::Decode(_))
        ));
        assert!(matches!(
            Account::decode(br#"{"UserId":"bob","Amount":"ten"}"#),
            Err(Error::Decode(_))
        ));
    }

    #[test]
    fn test_parse_amount() {
        assert_eq!(parse_amount("50").unwrap(), dec!(50));
        assert_eq!(parse_amount("-12.75").unwrap(), dec!(-12.75));
        assert_eq!(parse_amount("1e2").unwrap(), dec!(100));
        assert!(matches!(parse_amount("abc"), Err(Error::InvalidAmount(_))));
        assert!(matches!(parse_amount(""), Err(Error::InvalidAmount(_))));
    }

    #[test]
    fn test_parse_amount_rejects_separators_and_rounding() {
        assert!(matches!(parse_amount("1_000"), Err(Error::InvalidAmount(_))));
        assert!(matches!(parse_amount("1_0e2"), Err(Error::InvalidAmount(_))));

        // 29 fractional digits cannot be stored exactly
        let tiny = "0.00000000000000000000000000001";
        assert!(matches!(parse_amount(tiny), Err(Error::InvalidAmount(_))));
        assert!(matches!(parse_amount("1e-30"), Err(Error::InvalidAmount(_))));

        assert_eq!(
            parse_amount("0.0000000000000000000000000001").unwrap(),
            Decimal::new(1, 28)
        );
        assert_eq!(parse_amount("1e-28").unwrap(), Decimal::new(1, 28));
    }
}
