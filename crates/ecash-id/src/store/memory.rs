use std::collections::HashMap;

use parking_lot::RwLock;
use portable_atomic::{AtomicU64, Ordering};

use crate::{CounterStore, Period, StoreError};

/// An in-process [`CounterStore`].
///
/// Each period owns its own [`AtomicU64`]. The map of periods is only
/// write-locked the first time a period is seen; afterwards increments take a
/// shared read lock and advance the period's atomic with a compare-and-swap
/// loop, so allocations for different periods never wait on each other.
///
/// Counters live as long as the store. Use it in tests, or when a single
/// process owns allocation and losing the counters on restart is acceptable.
///
/// # Example
///
/// ```
/// use ecash_id::{CounterStore, MemoryCounterStore, Period};
///
/// let store = MemoryCounterStore::new();
/// let period = Period::new(2025, 3).unwrap();
///
/// assert_eq!(store.current(period).unwrap(), None);
/// assert_eq!(store.increment(period).unwrap(), 1);
/// assert_eq!(store.increment(period).unwrap(), 2);
/// assert_eq!(store.current(period).unwrap(), Some(2));
/// ```
#[derive(Debug, Default)]
pub struct MemoryCounterStore {
    #[cfg(feature = "cache-padded")]
    counters: RwLock<HashMap<Period, crossbeam_utils::CachePadded<AtomicU64>>>,
    #[cfg(not(feature = "cache-padded"))]
    counters: RwLock<HashMap<Period, AtomicU64>>,
}

impl MemoryCounterStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of periods that have seen at least one allocation.
    pub fn len(&self) -> usize {
        self.counters.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl CounterStore for MemoryCounterStore {
    fn increment(&self, period: Period) -> Result<u64, StoreError> {
        {
            let counters = self.counters.read();
            if let Some(counter) = counters.get(&period) {
                return bump(counter, period);
            }
        }

        let mut counters = self.counters.write();
        let counter = counters.entry(period).or_default();
        bump(counter, period)
    }

    fn current(&self, period: Period) -> Result<Option<u64>, StoreError> {
        Ok(self
            .counters
            .read()
            .get(&period)
            .map(|counter| counter.load(Ordering::Acquire)))
    }
}

/// Advances `counter` by one, refusing to wrap around.
fn bump(counter: &AtomicU64, period: Period) -> Result<u64, StoreError> {
    counter
        .fetch_update(Ordering::AcqRel, Ordering::Acquire, |value| {
            value.checked_add(1)
        })
        .map(|previous| previous + 1)
        .map_err(|_| StoreError::Exhausted { period })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tracks_periods_seen() {
        let store = MemoryCounterStore::new();
        assert!(store.is_empty());

        store.increment(Period::new(2025, 1).unwrap()).unwrap();
        store.increment(Period::new(2025, 1).unwrap()).unwrap();
        store.increment(Period::new(2025, 2).unwrap()).unwrap();

        assert_eq!(store.len(), 2);
    }

    #[test]
    fn current_does_not_create_counters() {
        let store = MemoryCounterStore::new();
        let period = Period::new(2025, 3).unwrap();

        assert_eq!(store.current(period).unwrap(), None);
        assert!(store.is_empty());
    }

    #[test]
    fn refuses_to_wrap() {
        let store = MemoryCounterStore::new();
        let period = Period::new(2025, 3).unwrap();
        store
            .counters
            .write()
            .insert(period, AtomicU64::new(u64::MAX).into());

        let err = store.increment(period).unwrap_err();
        assert!(matches!(err, StoreError::Exhausted { period: p } if p == period));
        assert_eq!(store.current(period).unwrap(), Some(u64::MAX));
    }
}
