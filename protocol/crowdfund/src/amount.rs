//! # Amount
//!
//! Arbitrary-precision integer money. Every monetary and stake calculation in
//! the protocol goes through [`Amount`] — floating point is never used.
//!
//! On the wire an amount is a decimal string (`"1000"`), matching the
//! big-integer-as-string envelope encoding. Internally it wraps a signed
//! [`BigInt`]: staged mutations on error paths may transiently dip below
//! zero, and the processor discards those stagings before commit, so
//! committed balances are never negative.

use std::fmt;
use std::ops::{Add, AddAssign, Sub, SubAssign};
use std::str::FromStr;

use num_bigint::BigInt;
use num_traits::{Signed, Zero};
use serde::{de, Deserialize, Deserializer, Serialize, Serializer};

/// A big-integer monetary value with decimal-string wire encoding.
#[derive(Clone, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Amount(BigInt);

impl Amount {
    pub fn zero() -> Self {
        Amount(BigInt::zero())
    }

    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }

    pub fn is_negative(&self) -> bool {
        self.0.is_negative()
    }

    /// Floor division by another amount. Division by zero yields zero, the
    /// same guard the payout formulas apply to an empty investment list.
    pub fn floor_div(&self, divisor: &Amount) -> Amount {
        if divisor.is_zero() {
            return Amount::zero();
        }
        Amount(&self.0 / &divisor.0)
    }

    /// Floor division by a period count.
    pub fn floor_div_u32(&self, divisor: u32) -> Amount {
        if divisor == 0 {
            return Amount::zero();
        }
        Amount(&self.0 / BigInt::from(divisor))
    }

    pub fn mul(&self, rhs: &Amount) -> Amount {
        Amount(&self.0 * &rhs.0)
    }

    /// Scale by a small integer factor (used for the vote-pass ratio check).
    pub fn scaled(&self, factor: u32) -> Amount {
        Amount(&self.0 * BigInt::from(factor))
    }
}

impl From<u64> for Amount {
    fn from(value: u64) -> Self {
        Amount(BigInt::from(value))
    }
}

impl FromStr for Amount {
    type Err = num_bigint::ParseBigIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Amount(BigInt::from_str(s)?))
    }
}

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.to_str_radix(10))
    }
}

impl Add for &Amount {
    type Output = Amount;

    fn add(self, rhs: &Amount) -> Amount {
        Amount(&self.0 + &rhs.0)
    }
}

impl Sub for &Amount {
    type Output = Amount;

    fn sub(self, rhs: &Amount) -> Amount {
        Amount(&self.0 - &rhs.0)
    }
}

impl AddAssign<&Amount> for Amount {
    fn add_assign(&mut self, rhs: &Amount) {
        self.0 += &rhs.0;
    }
}

impl SubAssign<&Amount> for Amount {
    fn sub_assign(&mut self, rhs: &Amount) {
        self.0 -= &rhs.0;
    }
}

impl Serialize for Amount {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for Amount {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse()
            .map_err(|_| de::Error::custom(format!("invalid decimal amount: {s:?}")))
    }
}
