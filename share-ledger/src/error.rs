//! Error types for the share ledger

use thiserror::Error;

/// Result type for ledger operations
pub type Result<T> = std::result::Result<T, Error>;

/// Share ledger errors
///
/// Every variant aborts the current invocation; the invocation's
/// transaction is dropped without being committed.
#[derive(Error, Debug)]
pub enum Error {
    /// Ledger `get` failed
    #[error("Ledger read error: {0}")]
    LedgerRead(String),

    /// Ledger `put` or batch commit failed
    #[error("Ledger write error: {0}")]
    LedgerWrite(String),

    /// Stored record is malformed
    #[error("Decode error: {0}")]
    Decode(String),

    /// Record could not be encoded
    #[error("Encode error: {0}")]
    Encode(String),

    /// Amount text is not a number, or arithmetic overflowed
    #[error("Invalid amount: {0}")]
    InvalidAmount(String),

    /// Wrong number of arguments for a function
    #[error("Incorrect number of arguments for {function}: expecting {expected}, got {got}")]
    Arity {
        /// Function name
        function: String,
        /// Human readable expectation ("2", "at least 1")
        expected: String,
        /// Number of arguments received
        got: usize,
    },

    /// User identifier is empty
    #[error("Invalid user id: {0}")]
    InvalidUserId(String),

    /// Function name not recognised by the router
    #[error("Invalid invoke function name: {0}")]
    UnknownFunction(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Short, stable label used for metrics and log fields
    pub fn kind(&self) -> &'static str {
        match self {
            Error::LedgerRead(_) => "ledger_read",
            Error::LedgerWrite(_) => "ledger_write",
            Error::Decode(_) => "decode",
            Error::Encode(_) => "encode",
            Error::InvalidAmount(_) => "invalid_amount",
            Error::Arity { .. } => "arity",
            Error::InvalidUserId(_) => "invalid_user_id",
            Error::UnknownFunction(_) => "unknown_function",
            Error::Config(_) => "config",
            Error::Io(_) => "io",
        }
    }
}
