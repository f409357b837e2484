//! Token time-to-live parsing (`"30s"`, `"15m"`, `"1h"`, `"7d"`).

use core::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::TokenError;

/// Unit suffix of a [`Ttl`] string.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TtlUnit {
    Seconds,
    Minutes,
    Hours,
    Days,
}

impl TtlUnit {
    fn from_suffix(c: char) -> Option<Self> {
        match c {
            's' => Some(TtlUnit::Seconds),
            'm' => Some(TtlUnit::Minutes),
            'h' => Some(TtlUnit::Hours),
            'd' => Some(TtlUnit::Days),
            _ => None,
        }
    }

    fn suffix(&self) -> char {
        match self {
            TtlUnit::Seconds => 's',
            TtlUnit::Minutes => 'm',
            TtlUnit::Hours => 'h',
            TtlUnit::Days => 'd',
        }
    }

    /// Seconds in one unit.
    pub fn seconds(&self) -> u64 {
        match self {
            TtlUnit::Seconds => 1,
            TtlUnit::Minutes => 60,
            TtlUnit::Hours => 60 * 60,
            TtlUnit::Days => 24 * 60 * 60,
        }
    }
}

/// Lifetime of a freshly minted token, as written in configuration.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct Ttl {
    value: u64,
    unit: TtlUnit,
    seconds: i64,
}

impl Ttl {
    pub fn new(value: u64, unit: TtlUnit) -> Result<Self, TokenError> {
        let seconds = value
            .checked_mul(unit.seconds())
            .and_then(|s| i64::try_from(s).ok())
            .ok_or_else(|| TokenError::invalid_duration(format!("{value}{} overflows", unit.suffix())))?;

        Ok(Self { value, unit, seconds })
    }

    pub fn seconds(value: u64) -> Result<Self, TokenError> {
        Self::new(value, TtlUnit::Seconds)
    }

    pub fn minutes(value: u64) -> Result<Self, TokenError> {
        Self::new(value, TtlUnit::Minutes)
    }

    pub fn hours(value: u64) -> Result<Self, TokenError> {
        Self::new(value, TtlUnit::Hours)
    }

    pub fn days(value: u64) -> Result<Self, TokenError> {
        Self::new(value, TtlUnit::Days)
    }

    pub fn unit(&self) -> TtlUnit {
        self.unit
    }

    /// Whole number of seconds this ttl spans.
    pub fn as_secs(&self) -> i64 {
        self.seconds
    }
}

impl Default for Ttl {
    /// One hour.
    fn default() -> Self {
        Self {
            value: 1,
            unit: TtlUnit::Hours,
            seconds: 3_600,
        }
    }
}

impl FromStr for Ttl {
    type Err = TokenError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let Some(last) = s.chars().last() else {
            return Err(TokenError::invalid_duration("empty duration"));
        };

        let unit = TtlUnit::from_suffix(last)
            .ok_or_else(|| TokenError::invalid_duration(format!("unknown unit in '{s}' (expected s, m, h or d)")))?;

        let digits = &s[..s.len() - last.len_utf8()];
        if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
            return Err(TokenError::invalid_duration(format!("'{s}' is not <integer><unit>")));
        }

        let value = digits
            .parse::<u64>()
            .map_err(|e| TokenError::invalid_duration(format!("'{s}': {e}")))?;

        Ttl::new(value, unit)
    }
}

impl core::fmt::Display for Ttl {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}{}", self.value, self.unit.suffix())
    }
}
