//! Transaction amount with exactly 2 decimal places.
//!
//! Uses `rust_decimal` internally with scale enforcement so the value
//! written into tag 54 never depends on floating-point formatting.

use crate::error::{PixError, Result};
use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// A strictly positive amount in reais, held at 2 decimal places.
///
/// Construction rejects zero, negative values and anything that would
/// lose precision below one cent, so every `Amount` is a valid tag 54 value.
/// Text input must be plain decimal notation: no exponents, separators or
/// underscores.
///
/// # Examples
///
/// ```
/// use std::str::FromStr;
/// use pix_brcode::Amount;
///
/// let amount = Amount::from_str("25.5").unwrap();
/// assert_eq!(amount.to_string(), "25.50");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Amount(Decimal);

impl Amount {
    /// The number of decimal places to maintain.
    pub const SCALE: u32 = 2;

    /// Longest rendering allowed in the transaction amount field.
    pub const MAX_LEN: usize = 13;

    /// Creates an `Amount` from a `Decimal`, normalizing to 2 decimal places.
    pub fn new(value: Decimal) -> Result<Self> {
        if value <= Decimal::ZERO || value.round_dp(Self::SCALE) != value {
            return Err(PixError::InvalidAmount(value.to_string()));
        }

        let mut normalized = value;
        normalized.rescale(Self::SCALE);

        let len = normalized.to_string().len();
        if len > Self::MAX_LEN {
            return Err(PixError::FieldTooLong {
                field: "transaction amount",
                len,
                max: Self::MAX_LEN,
            });
        }

        Ok(Amount(normalized))
    }

    /// Creates an `Amount` from a float, going through its shortest decimal
    /// representation so that `25.5_f64` becomes exactly `25.50`.
    pub fn from_f64(value: f64) -> Result<Self> {
        if !value.is_finite() {
            return Err(PixError::InvalidAmount(value.to_string()));
        }
        Self::from_str(&value.to_string())
    }

    /// Returns the underlying decimal value.
    pub fn value(&self) -> Decimal {
        self.0
    }
}

impl FromStr for Amount {
    type Err = PixError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let trimmed = s.trim();
        let invalid = || PixError::InvalidAmount(trimmed.to_string());

        // Plain decimal notation only; exponents never reach tag 54.
        if !trimmed
            .bytes()
            .all(|b| b.is_ascii_digit() || matches!(b, b'.' | b'-' | b'+'))
        {
            return Err(invalid());
        }

        // Exact parsing fails instead of rounding digits Decimal cannot hold.
        let decimal = Decimal::from_str_exact(trimmed).map_err(|_| invalid())?;
        Amount::new(decimal)
    }
}

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.2}", self.0)
    }
}

impl Serialize for Amount {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for Amount {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Amount::from_str(&s).map_err(serde::de::Error::custom)
    }
}
