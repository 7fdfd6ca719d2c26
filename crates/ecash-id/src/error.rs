use crate::StoreError;

/// A result type defaulting to this crate's [`Error`].
pub type Result<T, E = Error> = core::result::Result<T, E>;

/// All errors an allocation can surface.
///
/// Malformed identifiers are not represented here: validation and period
/// lookup return `bool`/`Option`, and typed parsing uses [`ParseError`].
///
/// [`ParseError`]: crate::ParseError
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum Error {
    /// The counter store could not perform the atomic increment.
    ///
    /// The counter is left untouched. Retrying the whole allocation is safe,
    /// though it only helps when [`StoreError::is_retryable`] holds.
    #[error("counter store unavailable: {0}")]
    StoreUnavailable(#[from] StoreError),

    /// The clock could not produce a period.
    #[error("clock error: {reason}")]
    Clock { reason: String },

    /// The year or month is out of range (`0..=9999`, `1..=12`).
    #[error("invalid period {year:04}-{month:02}")]
    InvalidPeriod { year: u16, month: u8 },
}

impl Error {
    /// Returns `true` when retrying the allocation may succeed.
    pub const fn is_retryable(&self) -> bool {
        matches!(self, Self::StoreUnavailable(e) if e.is_retryable())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Period;

    #[test]
    fn only_transient_store_failures_are_retryable() {
        let period = Period::new(2025, 3).unwrap();

        assert!(Error::from(StoreError::unavailable("database is locked")).is_retryable());
        assert!(!Error::from(StoreError::Exhausted { period }).is_retryable());
        assert!(!Error::from(StoreError::Corrupt { period, value: -4 }).is_retryable());
        assert!(!Error::InvalidPeriod { year: 2025, month: 13 }.is_retryable());
        assert!(
            !Error::Clock {
                reason: "no clock".to_owned()
            }
            .is_retryable()
        );
    }
}
