// Path: crates/types/src/app/decimal.rs

//! A fixed-point decimal with 18 fractional digits.
//!
//! Ballot thresholds are compared against vote ratios with exact integer
//! arithmetic: `count / total >= t` is evaluated as `count * ONE >= t * total`.

use crate::error::TransactionError;
use parity_scale_codec::{Decode, Encode};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

const FRACTIONAL_DIGITS: usize = 18;

/// A non-negative fixed-point decimal, stored as an integer scaled by 10^18.
#[derive(
    Encode,
    Decode,
    Serialize,
    Deserialize,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Debug,
    Default,
    Hash,
)]
#[serde(try_from = "String", into = "String")]
pub struct Dec(u128);

impl Dec {
    /// The scale factor: the raw value of `1.0`.
    pub const ONE_RAW: u128 = 1_000_000_000_000_000_000;
    /// `1.0`.
    pub const ONE: Dec = Dec(Self::ONE_RAW);
    /// `0.0`.
    pub const ZERO: Dec = Dec(0);

    /// Builds a decimal from its raw scaled integer.
    pub const fn from_raw(raw: u128) -> Self {
        Self(raw)
    }

    /// The raw scaled integer.
    pub const fn raw(self) -> u128 {
        self.0
    }

    /// `numerator / denominator`, truncated to 18 digits. Zero when the denominator is zero.
    pub fn from_ratio(numerator: u64, denominator: u64) -> Self {
        if denominator == 0 {
            return Self::ZERO;
        }
        Self((numerator as u128).saturating_mul(Self::ONE_RAW) / denominator as u128)
    }

    /// `1 - self`, saturating at zero.
    pub fn complement(self) -> Self {
        Self(Self::ONE_RAW.saturating_sub(self.0))
    }

    /// True for a usable ballot threshold: strictly positive and at most one.
    pub fn is_valid_threshold(self) -> bool {
        self.0 > 0 && self.0 <= Self::ONE_RAW
    }

    /// Exact `count / total >= self`.
    pub fn reached_by(self, count: u64, total: u64) -> bool {
        (count as u128).saturating_mul(Self::ONE_RAW) >= self.0.saturating_mul(total as u128)
    }

    /// Exact `count / total > self`.
    pub fn exceeded_by(self, count: u64, total: u64) -> bool {
        (count as u128).saturating_mul(Self::ONE_RAW) > self.0.saturating_mul(total as u128)
    }
}

impl fmt::Display for Dec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let int = self.0 / Self::ONE_RAW;
        let frac = self.0 % Self::ONE_RAW;
        if frac == 0 {
            return write!(f, "{}.0", int);
        }
        let digits = format!("{:0width$}", frac, width = FRACTIONAL_DIGITS);
        write!(f, "{}.{}", int, digits.trim_end_matches('0'))
    }
}

impl FromStr for Dec {
    type Err = TransactionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || TransactionError::Invalid(format!("invalid decimal '{}'", s));
        let (int_part, frac_part) = match s.trim().split_once('.') {
            Some((i, f)) => (i, f),
            None => (s.trim(), ""),
        };
        if int_part.is_empty() && frac_part.is_empty() {
            return Err(invalid());
        }
        if frac_part.len() > FRACTIONAL_DIGITS
            || !int_part.chars().all(|c| c.is_ascii_digit())
            || !frac_part.chars().all(|c| c.is_ascii_digit())
        {
            return Err(invalid());
        }
        let int: u128 = if int_part.is_empty() {
            0
        } else {
            int_part.parse().map_err(|_| invalid())?
        };
        let frac: u128 = if frac_part.is_empty() {
            0
        } else {
            let padded = format!("{:0<width$}", frac_part, width = FRACTIONAL_DIGITS);
            padded.parse().map_err(|_| invalid())?
        };
        int.checked_mul(Self::ONE_RAW)
            .and_then(|v| v.checked_add(frac))
            .map(Self)
            .ok_or_else(invalid)
    }
}

impl TryFrom<String> for Dec {
    type Error = TransactionError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Dec> for String {
    fn from(value: Dec) -> Self {
        value.to_string()
    }
}
