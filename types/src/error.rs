//! Errors raised while parsing primitive types.

use thiserror::Error;

/// Failure to parse a decimal amount string into a [`crate::TokenAmount`].
#[derive(Debug, Error, PartialEq, Eq)]
pub enum AmountParseError {
    #[error("amount string is empty")]
    Empty,

    #[error("invalid digit in amount: {0}")]
    InvalidDigit(String),

    #[error("too many decimal places: max {max}, found {found}")]
    TooManyDecimals { max: u32, found: usize },

    #[error("amount does not fit in 128 bits")]
    Overflow,
}
