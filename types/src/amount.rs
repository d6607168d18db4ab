//! Fixed-point token amounts.
//!
//! Amounts are represented as fixed-point integers (u128) with 18 decimal
//! places to avoid floating-point errors. The smallest unit is 1 raw; one
//! whole token is `10^18` raw.

use crate::error::AmountParseError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Add, Sub};
use std::str::FromStr;

/// Amount of a fungible asset, stored as raw units (u128).
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct TokenAmount(u128);

impl TokenAmount {
    /// Number of decimal places in the fixed-point representation.
    pub const DECIMALS: u32 = 18;

    /// Raw units per whole token.
    pub const UNIT: u128 = 10u128.pow(Self::DECIMALS);

    pub const ZERO: Self = Self(0);

    pub const MAX: Self = Self(u128::MAX);

    pub fn new(raw: u128) -> Self {
        Self(raw)
    }

    /// Whole tokens, e.g. `from_units(50)` is `50e18` raw.
    pub fn from_units(units: u64) -> Self {
        Self(units as u128 * Self::UNIT)
    }

    pub fn raw(&self) -> u128 {
        self.0
    }

    pub fn is_zero(&self) -> bool {
        self.0 == 0
    }

    pub fn checked_add(self, other: Self) -> Option<Self> {
        self.0.checked_add(other.0).map(Self)
    }

    pub fn checked_sub(self, other: Self) -> Option<Self> {
        self.0.checked_sub(other.0).map(Self)
    }

    pub fn saturating_sub(self, other: Self) -> Self {
        Self(self.0.saturating_sub(other.0))
    }

    /// `floor(self * numerator / denominator)`.
    ///
    /// Returns `None` if the intermediate product overflows or the
    /// denominator is zero.
    pub fn checked_mul_div(self, numerator: u128, denominator: u128) -> Option<Self> {
        self.0
            .checked_mul(numerator)?
            .checked_div(denominator)
            .map(Self)
    }
}

impl Add for TokenAmount {
    type Output = Self;
    fn add(self, rhs: Self) -> Self {
        Self(self.0 + rhs.0)
    }
}

impl Sub for TokenAmount {
    type Output = Self;
    fn sub(self, rhs: Self) -> Self {
        Self(self.0 - rhs.0)
    }
}

impl fmt::Display for TokenAmount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let whole = self.0 / Self::UNIT;
        let frac = self.0 % Self::UNIT;
        if frac == 0 {
            return write!(f, "{whole}");
        }
        let digits = format!("{:0>width$}", frac, width = Self::DECIMALS as usize);
        write!(f, "{whole}.{}", digits.trim_end_matches('0'))
    }
}

impl FromStr for TokenAmount {
    type Err = AmountParseError;

    /// Parse a decimal string such as `"50"` or `"12.5"` into raw units.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.is_empty() {
            return Err(AmountParseError::Empty);
        }
        let (whole, frac) = match s.split_once('.') {
            Some((w, f)) => (w, f),
            None => (s, ""),
        };
        if whole.is_empty() && frac.is_empty() {
            return Err(AmountParseError::Empty);
        }
        if !whole.chars().chain(frac.chars()).all(|c| c.is_ascii_digit()) {
            return Err(AmountParseError::InvalidDigit(s.to_string()));
        }
        if frac.len() > Self::DECIMALS as usize {
            return Err(AmountParseError::TooManyDecimals {
                max: Self::DECIMALS,
                found: frac.len(),
            });
        }

        let whole_raw = if whole.is_empty() {
            0
        } else {
            whole
                .parse::<u128>()
                .map_err(|_| AmountParseError::Overflow)?
        };
        let frac_raw = if frac.is_empty() {
            0
        } else {
            let padded = format!("{:0<width$}", frac, width = Self::DECIMALS as usize);
            padded
                .parse::<u128>()
                .map_err(|_| AmountParseError::InvalidDigit(s.to_string()))?
        };

        whole_raw
            .checked_mul(Self::UNIT)
            .and_then(|w| w.checked_add(frac_raw))
            .map(Self)
            .ok_or(AmountParseError::Overflow)
    }
}
