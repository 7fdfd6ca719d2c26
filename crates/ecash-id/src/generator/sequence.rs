#[cfg(feature = "tracing")]
use tracing::instrument;

use crate::{CounterStore, Error, Period, PeriodSource, RequestId, Result, SystemClock};

/// Allocates [`RequestId`]s from a [`CounterStore`].
///
/// The generator is stateless apart from the injected store and clock: it
/// takes no lock and never remembers a sequence number between calls. Every
/// allocation is exactly one call to [`CounterStore::increment`], and the
/// identifier is built from the value that call returned. Uniqueness across
/// threads and processes therefore rests entirely on the store's atomic
/// increment.
///
/// ## Ordering
///
/// Within a period, sequence numbers increase in the order the store applied
/// the increments. Two racing callers may receive them in either order.
///
/// # Example
///
/// ```
/// use std::sync::Arc;
///
/// use ecash_id::{FixedPeriod, MemoryCounterStore, Period, SequenceGenerator};
///
/// let store = Arc::new(MemoryCounterStore::new());
/// let march = Period::new(2025, 3).unwrap();
/// let april = Period::new(2025, 4).unwrap();
///
/// let generator = SequenceGenerator::new(Arc::clone(&store), FixedPeriod(march));
/// assert_eq!(generator.next_id().unwrap().to_string(), "GHC-2025-03-001");
/// assert_eq!(generator.next_id().unwrap().to_string(), "GHC-2025-03-002");
///
/// // A new month starts a new sequence.
/// assert_eq!(generator.next_id_for(april).unwrap().to_string(), "GHC-2025-04-001");
/// ```
#[derive(Clone, Debug)]
pub struct SequenceGenerator<S, C = SystemClock>
where
    S: CounterStore,
    C: PeriodSource,
{
    store: S,
    clock: C,
}

impl<S> SequenceGenerator<S, SystemClock>
where
    S: CounterStore,
{
    /// Creates a generator reading the period from the UTC wall clock.
    pub const fn with_system_clock(store: S) -> Self {
        Self::new(store, SystemClock::utc())
    }
}

impl<S, C> SequenceGenerator<S, C>
where
    S: CounterStore,
    C: PeriodSource,
{
    pub const fn new(store: S, clock: C) -> Self {
        Self { store, clock }
    }

    pub const fn store(&self) -> &S {
        &self.store
    }

    pub const fn clock(&self) -> &C {
        &self.clock
    }

    /// Allocates the next identifier in the clock's current period.
    ///
    /// # Errors
    ///
    /// - [`Error::Clock`] if the clock cannot produce a period. Nothing is
    ///   allocated.
    /// - [`Error::StoreUnavailable`] if the increment failed. The counter is
    ///   unchanged and the call may be retried.
    #[cfg_attr(feature = "tracing", instrument(level = "trace", skip(self)))]
    pub fn next_id(&self) -> Result<RequestId> {
        let period = self.clock.current_period()?;
        self.next_id_for(period)
    }

    /// Allocates the next identifier in `period`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::StoreUnavailable`] if the increment failed. The counter
    /// is unchanged and the call may be retried.
    #[cfg_attr(feature = "tracing", instrument(level = "trace", skip(self)))]
    pub fn next_id_for(&self, period: Period) -> Result<RequestId> {
        match self.store.increment(period) {
            Ok(sequence) => {
                let id = RequestId::from_components(period, sequence);
                #[cfg(feature = "tracing")]
                tracing::debug!(%id, "allocated request id");
                Ok(id)
            }
            Err(e) => {
                #[cfg(feature = "tracing")]
                tracing::warn!(error = %e, "sequence allocation failed");
                Err(Error::StoreUnavailable(e))
            }
        }
    }

    /// Returns the last sequence number issued in `period`, if any.
    ///
    /// This is a read-only snapshot for reporting; it must not be used to
    /// predict the next identifier.
    ///
    /// # Errors
    ///
    /// Returns [`Error::StoreUnavailable`] if the store cannot be read.
    pub fn current(&self, period: Period) -> Result<Option<u64>> {
        Ok(self.store.current(period)?)
    }
}
