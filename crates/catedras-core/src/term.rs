//! Academic terms (cuatrimestres).

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{CoreError, Result};

/// An academic half-year period.
///
/// Ordered by year, then by number within the year. The field order matters:
/// the derived `Ord` compares `year` first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Term {
    year: u16,
    number: u8,
}

impl Term {
    /// Build a term, rejecting numbers other than 1 or 2.
    pub fn new(year: u16, number: u8) -> Result<Self> {
        if !(1..=2).contains(&number) {
            return Err(CoreError::InvalidTerm { year, number });
        }
        Ok(Self { year, number })
    }

    pub fn year(&self) -> u16 {
        self.year
    }

    pub fn number(&self) -> u8 {
        self.number
    }

    /// True when `self` comes strictly later than `other`.
    pub fn is_after(&self, other: &Term) -> bool {
        self > other
    }
}

impl fmt::Display for Term {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.year, self.number)
    }
}

impl FromStr for Term {
    type Err = CoreError;

    /// Parse a `YYYY-N` label such as `2025-1`.
    fn from_str(s: &str) -> Result<Self> {
        let invalid = || CoreError::InvalidTermLabel(s.to_string());
        let (year, number) = s.trim().split_once('-').ok_or_else(invalid)?;
        let year = year.trim();
        if year.len() != 4 || !year.chars().all(|c| c.is_ascii_digit()) {
            return Err(invalid());
        }
        let year: u16 = year.parse().map_err(|_| invalid())?;
        let number: u8 = number.trim().parse().map_err(|_| invalid())?;
        Term::new(year, number)
    }
}
