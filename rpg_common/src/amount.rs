use std::{fmt::Display, str::FromStr};

use serde::{de, Deserialize, Deserializer, Serialize, Serializer};
use thiserror::Error;

const MINOR_UNITS_PER_MAJOR: i64 = 100;

//--------------------------------------       Amount        ---------------------------------------------------------
/// A strictly positive monetary amount.
///
/// Clients submit amounts in major units (e.g. rupees, `500.00`). Internally the value is held in minor units so that
/// it can be handed to the payment gateway without further rounding. Serialization round-trips through major units.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Amount(i64);

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AmountError {
    #[error("Amount must be a finite number, got {0}")]
    NotANumber(String),
    #[error("Amount must be greater than zero, got {0}")]
    NotPositive(String),
    #[error("Amount is too large: {0}")]
    TooLarge(String),
}

impl Amount {
    /// Converts an amount in major units into an `Amount`, rounding to the nearest minor unit.
    pub fn from_major(value: f64) -> Result<Self, AmountError> {
        if !value.is_finite() {
            return Err(AmountError::NotANumber(value.to_string()));
        }
        let minor = (value * MINOR_UNITS_PER_MAJOR as f64).round();
        if minor >= i64::MAX as f64 {
            return Err(AmountError::TooLarge(value.to_string()));
        }
        #[allow(clippy::cast_possible_truncation)]
        Self::from_minor(minor as i64).map_err(|_| AmountError::NotPositive(value.to_string()))
    }

    pub fn from_minor(minor: i64) -> Result<Self, AmountError> {
        if minor <= 0 {
            return Err(AmountError::NotPositive(minor.to_string()));
        }
        Ok(Self(minor))
    }

    /// The value in minor units (paise, cents), as the payment gateway expects it.
    pub fn minor_units(&self) -> i64 {
        self.0
    }

    pub fn as_major(&self) -> f64 {
        self.0 as f64 / MINOR_UNITS_PER_MAJOR as f64
    }
}

impl Display for Amount {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}.{:02}", self.0 / MINOR_UNITS_PER_MAJOR, self.0 % MINOR_UNITS_PER_MAJOR)
    }
}

impl FromStr for Amount {
    type Err = AmountError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let value = s.trim().parse::<f64>().map_err(|_| AmountError::NotANumber(s.to_string()))?;
        Self::from_major(value)
    }
}

impl Serialize for Amount {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_f64(self.as_major())
    }
}

impl<'de> Deserialize<'de> for Amount {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        // Web clients are not consistent about sending numbers rather than numeric strings
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum RawAmount {
            Number(f64),
            Text(String),
        }
        match RawAmount::deserialize(deserializer)? {
            RawAmount::Number(v) => Amount::from_major(v),
            RawAmount::Text(s) => Amount::from_str(&s),
        }
        .map_err(de::Error::custom)
    }
}
