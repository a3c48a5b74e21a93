use std::{
    fmt::Display,
    iter::Sum,
    ops::Add,
};

use serde::{Deserialize, Serialize};
use sqlx::Type;
use thiserror::Error;

use crate::op;

/// Currency of every balance held in the ledger. Amounts are always expressed in its smallest unit (kobo).
pub const LEDGER_CURRENCY_CODE: &str = "NGN";

//--------------------------------------     MinorUnits       ---------------------------------------------------------
/// An amount of money in the smallest currency unit. Balances and ledger entry amounts are stored as `MinorUnits`.
#[derive(Debug, Clone, Copy, Default, Type, PartialEq, Eq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
#[sqlx(transparent)]
#[serde(transparent)]
pub struct MinorUnits(i64);

op!(binary MinorUnits, Add, add);
op!(binary MinorUnits, Sub, sub);
op!(inplace MinorUnits, AddAssign, add_assign);
op!(inplace MinorUnits, SubAssign, sub_assign);
op!(unary MinorUnits, Neg, neg);

impl Sum for MinorUnits {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::default(), Add::add)
    }
}

#[derive(Debug, Clone, Error)]
#[error("Value cannot be represented in minor units: {0}")]
pub struct MinorUnitsConversionError(String);

impl From<i64> for MinorUnits {
    fn from(value: i64) -> Self {
        Self(value)
    }
}

impl TryFrom<u64> for MinorUnits {
    type Error = MinorUnitsConversionError;

    fn try_from(value: u64) -> Result<Self, Self::Error> {
        i64::try_from(value)
            .map(Self)
            .map_err(|_| MinorUnitsConversionError(format!("Value {value} is too large to convert to MinorUnits")))
    }
}

impl Display for MinorUnits {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        let abs = self.0.unsigned_abs();
        write!(f, "{sign}{}.{:02} {LEDGER_CURRENCY_CODE}", abs / 100, abs % 100)
    }
}

impl MinorUnits {
    pub const ZERO: MinorUnits = MinorUnits(0);

    pub fn value(&self) -> i64 {
        self.0
    }

    /// Converts a whole number of major units (e.g. Naira) into minor units.
    pub fn from_major(major: i64) -> Result<Self, MinorUnitsConversionError> {
        major
            .checked_mul(100)
            .map(Self)
            .ok_or_else(|| MinorUnitsConversionError(format!("{major} major units do not fit in MinorUnits")))
    }

    pub fn is_positive(&self) -> bool {
        self.0 > 0
    }

    pub fn is_negative(&self) -> bool {
        self.0 < 0
    }

    pub fn checked_add(self, rhs: Self) -> Option<Self> {
        self.0.checked_add(rhs.0).map(Self)
    }

    pub fn checked_sub(self, rhs: Self) -> Option<Self> {
        self.0.checked_sub(rhs.0).map(Self)
    }
}
