use core::{fmt, str::FromStr};

use crate::{ParseError, Period};

/// The literal every request identifier starts with.
pub const PREFIX: &str = "GHC";

/// Minimum number of digits the sequence is zero-padded to.
///
/// Sequences of 1000 or more widen the field instead of being truncated.
pub const SEQUENCE_WIDTH: usize = 3;

/// A request identifier: `GHC-YYYY-MM-SEQ`.
///
/// Identifiers compare by period, then by sequence, which is the order they
/// were issued in for a single store.
///
/// # Example
///
/// ```
/// use ecash_id::{Period, RequestId};
///
/// let id = RequestId::from_components(Period::new(2025, 3).unwrap(), 7);
/// assert_eq!(id.to_string(), "GHC-2025-03-007");
///
/// let parsed: RequestId = "GHC-2025-03-007".parse().unwrap();
/// assert_eq!(parsed, id);
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RequestId {
    period: Period,
    sequence: u64,
}

impl RequestId {
    pub const fn from_components(period: Period, sequence: u64) -> Self {
        Self { period, sequence }
    }

    pub const fn period(&self) -> Period {
        self.period
    }

    pub const fn year(&self) -> u16 {
        self.period.year()
    }

    pub const fn month(&self) -> u8 {
        self.period.month()
    }

    pub const fn sequence(&self) -> u64 {
        self.sequence
    }

    /// See [`is_valid`].
    pub fn is_valid(s: &str) -> bool {
        is_valid(s)
    }

    /// See [`parse_period`].
    pub fn parse_period(s: &str) -> Option<Period> {
        parse_period(s)
    }
}

impl fmt::Display for RequestId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}-{:04}-{:02}-{:0width$}",
            PREFIX,
            self.period.year(),
            self.period.month(),
            self.sequence,
            width = SEQUENCE_WIDTH
        )
    }
}

impl FromStr for RequestId {
    type Err = ParseError;

    /// Parses an identifier minted by this crate, including sequences wider
    /// than [`SEQUENCE_WIDTH`].
    ///
    /// Only the canonical rendering is accepted, so `parse` followed by
    /// `to_string` always reproduces the input.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let fields = Fields::split(s)?;
        let year = fields.year()?;
        let month = fields.month()?;
        let period = Period::new(year, month).map_err(|_| ParseError::MonthOutOfRange { month })?;
        let sequence = fields.sequence()?;
        Ok(Self::from_components(period, sequence))
    }
}

/// Returns `true` iff `s` is exactly `GHC-`, 4 digits, `-`, 2 digits, `-`,
/// 3 digits.
///
/// This is a pure pattern check: it never fails, and it does not check that
/// the month is a calendar month.
///
/// ```
/// use ecash_id::is_valid;
///
/// assert!(is_valid("GHC-2025-01-001"));
/// assert!(!is_valid("GHC-2025-1-001"));
/// assert!(!is_valid("ghc-2025-01-001"));
/// assert!(!is_valid(""));
/// ```
pub fn is_valid(s: &str) -> bool {
    Fields::split(s).is_ok_and(|fields| fields.sequence.len() == SEQUENCE_WIDTH)
}

/// Extracts the period from an identifier this crate could have issued.
///
/// Unlike [`is_valid`], sequences wider than [`SEQUENCE_WIDTH`] are accepted,
/// so every rendered [`RequestId`] maps back to its period. Returns `None` for
/// malformed input or a month outside `1..=12`. Malformed input is expected
/// here (e.g. user-supplied search strings), so this never fails loudly.
pub fn parse_period(s: &str) -> Option<Period> {
    s.parse::<RequestId>().ok().map(|id| id.period())
}

/// The three digit groups of a structurally well-formed identifier.
struct Fields<'a> {
    year: &'a str,
    month: &'a str,
    sequence: &'a str,
}

impl<'a> Fields<'a> {
    fn split(s: &'a str) -> Result<Self, ParseError> {
        let rest = s
            .strip_prefix(PREFIX)
            .and_then(|rest| rest.strip_prefix('-'))
            .ok_or(ParseError::InvalidPrefix)?;

        let mut parts = rest.splitn(3, '-');
        let year = parts.next().unwrap_or_default();
        let month = parts.next().unwrap_or_default();
        let sequence = parts.next().unwrap_or_default();

        if year.len() != 4 || !all_digits(year) {
            return Err(ParseError::InvalidYear {
                found: year.to_owned(),
            });
        }
        if month.len() != 2 || !all_digits(month) {
            return Err(ParseError::InvalidMonth {
                found: month.to_owned(),
            });
        }
        if sequence.len() < SEQUENCE_WIDTH || !all_digits(sequence) {
            return Err(ParseError::InvalidSequence {
                found: sequence.to_owned(),
            });
        }

        Ok(Self {
            year,
            month,
            sequence,
        })
    }

    fn year(&self) -> Result<u16, ParseError> {
        self.year.parse().map_err(|_| ParseError::InvalidYear {
            found: self.year.to_owned(),
        })
    }

    fn month(&self) -> Result<u8, ParseError> {
        self.month.parse().map_err(|_| ParseError::InvalidMonth {
            found: self.month.to_owned(),
        })
    }

    fn sequence(&self) -> Result<u64, ParseError> {
        let invalid = || ParseError::InvalidSequence {
            found: self.sequence.to_owned(),
        };
        // A widened sequence never carries leading zeros.
        if self.sequence.len() > SEQUENCE_WIDTH && self.sequence.starts_with('0') {
            return Err(invalid());
        }
        self.sequence.parse().map_err(|_| invalid())
    }
}

fn all_digits(s: &str) -> bool {
    s.bytes().all(|b| b.is_ascii_digit())
}
