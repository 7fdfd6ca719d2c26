use std::sync::Arc;

use chrono::{Datelike, Local, Utc};

use crate::{Error, Period, Result};

/// A source of the current [`Period`].
///
/// This abstraction allows you to plug in the wall clock or a fixed period in
/// tests and batch jobs.
///
/// # Example
///
/// ```
/// use ecash_id::{Period, PeriodSource, Result};
///
/// struct EndOfYear;
/// impl PeriodSource for EndOfYear {
///     fn current_period(&self) -> Result<Period> {
///         Period::new(2024, 12)
///     }
/// }
///
/// assert_eq!(EndOfYear.current_period().unwrap().to_string(), "2024-12");
/// ```
pub trait PeriodSource {
    /// Returns the period allocations should currently be made in.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Clock`] if the current date cannot be read or does not
    /// map to a valid period.
    fn current_period(&self) -> Result<Period>;
}

impl<P: PeriodSource + ?Sized> PeriodSource for &P {
    fn current_period(&self) -> Result<Period> {
        (**self).current_period()
    }
}

impl<P: PeriodSource + ?Sized> PeriodSource for Arc<P> {
    fn current_period(&self) -> Result<Period> {
        (**self).current_period()
    }
}

impl<P: PeriodSource + ?Sized> PeriodSource for Box<P> {
    fn current_period(&self) -> Result<Period> {
        (**self).current_period()
    }
}

/// Which calendar the wall clock is read in.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Timezone {
    /// Coordinated Universal Time.
    #[default]
    Utc,
    /// The host's local timezone.
    Local,
}

/// Wall-clock [`PeriodSource`].
///
/// Near midnight on the last day of a month the period depends on the
/// timezone, so every process sharing a store should use the same one.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SystemClock {
    timezone: Timezone,
}

impl SystemClock {
    /// A clock reading the current date in UTC.
    pub const fn utc() -> Self {
        Self::with_timezone(Timezone::Utc)
    }

    /// A clock reading the current date in the host's local timezone.
    pub const fn local() -> Self {
        Self::with_timezone(Timezone::Local)
    }

    pub const fn with_timezone(timezone: Timezone) -> Self {
        Self { timezone }
    }

    pub const fn timezone(&self) -> Timezone {
        self.timezone
    }
}

impl PeriodSource for SystemClock {
    fn current_period(&self) -> Result<Period> {
        match self.timezone {
            Timezone::Utc => period_of(&Utc::now()),
            Timezone::Local => period_of(&Local::now()),
        }
    }
}

fn period_of(date: &impl Datelike) -> Result<Period> {
    let year = u16::try_from(date.year()).map_err(|_| Error::Clock {
        reason: format!("year {} is outside 0..={}", date.year(), Period::MAX_YEAR),
    })?;
    let month = u8::try_from(date.month()).map_err(|_| Error::Clock {
        reason: format!("month {} is not a calendar month", date.month()),
    })?;
    Period::new(year, month).map_err(|e| Error::Clock {
        reason: e.to_string(),
    })
}

/// A [`PeriodSource`] that always returns the same period.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FixedPeriod(pub Period);

impl PeriodSource for FixedPeriod {
    fn current_period(&self) -> Result<Period> {
        Ok(self.0)
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;

    #[test]
    fn maps_calendar_dates_to_periods() {
        let date = NaiveDate::from_ymd_opt(2025, 3, 31).unwrap();
        assert_eq!(period_of(&date).unwrap(), Period::new(2025, 3).unwrap());
    }

    #[test]
    fn rejects_years_outside_four_digits() {
        let date = NaiveDate::from_ymd_opt(10_000, 1, 1).unwrap();
        assert!(matches!(period_of(&date), Err(Error::Clock { .. })));

        let date = NaiveDate::from_ymd_opt(-1, 1, 1).unwrap();
        assert!(matches!(period_of(&date), Err(Error::Clock { .. })));
    }

    #[test]
    fn system_clock_agrees_with_chrono() {
        let now = Utc::now();
        let period = SystemClock::utc().current_period().unwrap();
        // Tolerate a month boundary between the two reads.
        let expected = period_of(&now).unwrap();
        assert!(period == expected || expected.succ() == Some(period));
    }

    #[test]
    fn fixed_period_is_constant() {
        let period = Period::new(2025, 1).unwrap();
        let clock = FixedPeriod(period);
        assert_eq!(clock.current_period().unwrap(), period);
        assert_eq!((&clock).current_period().unwrap(), period);
    }
}
