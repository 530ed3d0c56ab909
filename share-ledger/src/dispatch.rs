//! Routing of `(function, args)` invocations
//!
//! Arity and argument syntax are checked here, before any ledger access.

use crate::{
    types::{parse_amount, UserId},
    Error, Result,
};
use rust_decimal::Decimal;
use std::fmt;

/// A parsed, validated invocation
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Invocation {
    /// `initUser [userId]`
    InitUser {
        /// Account to create
        user_id: UserId,
    },

    /// `query [userId]`
    Query {
        /// Account to read
        user_id: UserId,
    },

    /// `completeShare [sharer, listener...]`
    CompleteShare {
        /// User who shared
        sharer: UserId,
        /// Users who listened, in credit order
        listeners: Vec<UserId>,
    },

    /// `shopping [userId, amount]`
    Shopping {
        /// Paying user
        user_id: UserId,
        /// Amount paid into the reward pool
        amount: Decimal,
    },

    /// `transfer [from, to, amount]`
    Transfer {
        /// Debited user
        from: UserId,
        /// Credited user
        to: UserId,
        /// Amount moved
        amount: Decimal,
    },
}

impl Invocation {
    /// Every routable function name
    pub const FUNCTIONS: [&'static str; 5] =
        ["initUser", "query", "completeShare", "shopping", "transfer"];

    /// Parse a function name and its arguments
    pub fn parse<A: AsRef<str>>(function: &str, args: &[A]) -> Result<Self> {
        match function {
            "initUser" => {
                expect_args(function, args, 1)?;
                Ok(Invocation::InitUser {
                    user_id: user_arg(&args[0])?,
                })
            }
            "query" => {
                expect_args(function, args, 1)?;
                Ok(Invocation::Query {
                    user_id: user_arg(&args[0])?,
                })
            }
            "completeShare" => {
                if args.is_empty() {
                    return Err(Error::Arity {
                        function: function.to_string(),
                        expected: "at least 1".to_string(),
                        got: 0,
                    });
                }
                let sharer = user_arg(&args[0])?;
                let listeners = args[1..].iter().map(user_arg).collect::<Result<Vec<_>>>()?;
                Ok(Invocation::CompleteShare { sharer, listeners })
            }
            "shopping" => {
                expect_args(function, args, 2)?;
                Ok(Invocation::Shopping {
                    user_id: user_arg(&args[0])?,
                    amount: parse_amount(args[1].as_ref())?,
                })
            }
            "transfer" => {
                expect_args(function, args, 3)?;
                Ok(Invocation::Transfer {
                    from: user_arg(&args[0])?,
                    to: user_arg(&args[1])?,
                    amount: parse_amount(args[2].as_ref())?,
                })
            }
            other => Err(Error::UnknownFunction(format!(
                "{:?}, expecting \"initUser\" \"query\" \"completeShare\" \"shopping\" \"transfer\"",
                other
            ))),
        }
    }

    /// Function name this invocation was parsed from
    pub fn function(&self) -> &'static str {
        match self {
            Invocation::InitUser { .. } => "initUser",
            Invocation::Query { .. } => "query",
            Invocation::CompleteShare { .. } => "completeShare",
            Invocation::Shopping { .. } => "shopping",
            Invocation::Transfer { .. } => "transfer",
        }
    }
}

fn expect_args<A>(function: &str, args: &[A], expected: usize) -> Result<()> {
    if args.len() != expected {
        return Err(Error::Arity {
            function: function.to_string(),
            expected: expected.to_string(),
            got: args.len(),
        });
    }
    Ok(())
}

fn user_arg<A: AsRef<str>>(arg: &A) -> Result<UserId> {
    UserId::new(arg.as_ref())
}

/// Response status, following the host's HTTP-like codes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    /// 200
    Ok,
    /// 500
    Error,
}

impl Status {
    /// Numeric code
    pub fn code(&self) -> u16 {
        match self {
            Status::Ok => 200,
            Status::Error => 500,
        }
    }
}

/// Envelope returned to the host for every invocation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Response {
    /// Outcome
    pub status: Status,
    /// Error message, empty on success
    pub message: String,
    /// Success payload, empty on error
    pub payload: Vec<u8>,
}

impl Response {
    /// Successful response carrying `payload`
    pub fn success(payload: Vec<u8>) -> Self {
        Self {
            status: Status::Ok,
            message: String::new(),
            payload,
        }
    }

    /// Failed response carrying the error's message
    pub fn error(err: &Error) -> Self {
        Self {
            status: Status::Error,
            message: err.to_string(),
            payload: Vec::new(),
        }
    }

    /// True for [`Status::Ok`]
    pub fn is_ok(&self) -> bool {
        self.status == Status::Ok
    }
}

impl From<Result<Vec<u8>>> for Response {
    fn from(result: Result<Vec<u8>>) -> Self {
        match result {
            Ok(payload) => Response::success(payload),
            Err(err) => Response::error(&err),
        }
    }
}

impl fmt::Display for Response {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.status {
            Status::Ok => write!(
                f,
                "{} {}",
                self.status.code(),
                String::from_utf8_lossy(&self.payload)
            ),
            Status::Error => write!(f, "{} {}", self.status.code(), self.message),
        }
    }
}
