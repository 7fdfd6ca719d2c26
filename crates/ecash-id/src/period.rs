use core::fmt;

use crate::{Error, Result};

/// The `(year, month)` key that scopes one independent sequence counter.
///
/// Periods order chronologically: by year, then by month.
///
/// # Example
///
/// ```
/// use ecash_id::Period;
///
/// let period = Period::new(2025, 3).unwrap();
/// assert_eq!(period.to_string(), "2025-03");
/// assert_eq!(period.succ(), Some(Period::new(2025, 4).unwrap()));
///
/// assert!(Period::new(2025, 13).is_err());
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Period {
    year: u16,
    month: u8,
}

impl Period {
    /// Largest year that still renders as 4 digits.
    pub const MAX_YEAR: u16 = 9999;

    /// Creates a period, rejecting a year above [`Self::MAX_YEAR`] or a month
    /// outside `1..=12`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidPeriod`] when either component is out of range.
    pub const fn new(year: u16, month: u8) -> Result<Self> {
        if year > Self::MAX_YEAR || month < 1 || month > 12 {
            return Err(Error::InvalidPeriod { year, month });
        }
        Ok(Self { year, month })
    }

    /// The calendar year.
    pub const fn year(&self) -> u16 {
        self.year
    }

    /// The calendar month, `1..=12`.
    pub const fn month(&self) -> u8 {
        self.month
    }

    /// The period immediately after this one, or `None` after `9999-12`.
    pub const fn succ(&self) -> Option<Self> {
        if self.month < 12 {
            Some(Self {
                year: self.year,
                month: self.month + 1,
            })
        } else if self.year < Self::MAX_YEAR {
            Some(Self {
                year: self.year + 1,
                month: 1,
            })
        } else {
            None
        }
    }
}

impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

impl TryFrom<(u16, u8)> for Period {
    type Error = Error;

    fn try_from((year, month): (u16, u8)) -> Result<Self> {
        Self::new(year, month)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_out_of_range_components() {
        assert!(matches!(
            Period::new(2025, 0),
            Err(Error::InvalidPeriod { year: 2025, month: 0 })
        ));
        assert!(Period::new(2025, 13).is_err());
        assert!(Period::new(10_000, 1).is_err());
        assert!(Period::new(0, 1).is_ok());
        assert!(Period::new(9999, 12).is_ok());
    }

    #[test]
    fn displays_zero_padded() {
        assert_eq!(Period::new(2025, 1).unwrap().to_string(), "2025-01");
        assert_eq!(Period::new(7, 11).unwrap().to_string(), "0007-11");
    }

    #[test]
    fn succ_rolls_over_year_boundary() {
        let dec = Period::new(2024, 12).unwrap();
        assert_eq!(dec.succ(), Some(Period::new(2025, 1).unwrap()));
        assert_eq!(Period::new(9999, 12).unwrap().succ(), None);
    }

    #[test]
    fn orders_chronologically() {
        let a = Period::new(2024, 12).unwrap();
        let b = Period::new(2025, 1).unwrap();
        let c = Period::new(2025, 2).unwrap();
        assert!(a < b && b < c);
    }
}
