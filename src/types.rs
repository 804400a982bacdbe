use std::fmt;
use std::ops::Sub;
use std::str::FromStr;

pub type OrderId = u64;
pub type Quantity = u64;

/// Nanoseconds since an arbitrary epoch.
pub type Nanos = u64;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Side {
    Bid,
    Ask,
}

impl Side {
    pub fn opposite(self) -> Self {
        match self {
            Self::Bid => Self::Ask,
            Self::Ask => Self::Bid,
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Side::Bid => write!(f, "bid"),
            Side::Ask => write!(f, "ask"),
        }
    }
}

/// Price in minor units: hundredths of the quote currency, two implied
/// fraction digits. Keys price levels, so it must be totally ordered.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Price(u64);

/// Upper bound accepted from decimal input, in whole quote units.
const MAX_PRICE_UNITS: f64 = 1e12;

impl Price {
    pub const ZERO: Price = Price(0);

    pub const fn from_cents(cents: u64) -> Self {
        Price(cents)
    }

    /// Rounds to the nearest cent. `None` for non-finite, negative, or
    /// absurdly large inputs.
    pub fn from_decimal(value: f64) -> Option<Self> {
        if !value.is_finite() || !(0.0..=MAX_PRICE_UNITS).contains(&value) {
            return None;
        }
        Some(Price((value * 100.0).round() as u64))
    }

    pub fn cents(self) -> u64 {
        self.0
    }

    pub fn is_zero(self) -> bool {
        self.0 == 0
    }

    pub fn saturating_sub(self, other: Price) -> Price {
        Price(self.0.saturating_sub(other.0))
    }
}

impl Sub for Price {
    type Output = Price;

    fn sub(self, other: Price) -> Price {
        Price(self.0 - other.0)
    }
}

#[derive(Debug, thiserror::Error)]
#[error("invalid price literal: {0}")]
pub struct ParsePriceError(String);

impl FromStr for Price {
    type Err = ParsePriceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let value: f64 = s.parse().map_err(|_| ParsePriceError(s.to_string()))?;
        Price::from_decimal(value).ok_or_else(|| ParsePriceError(s.to_string()))
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{:02}", self.0 / 100, self.0 % 100)
    }
}
