use std::sync::Arc;

use crate::Period;

/// A mapping from [`Period`] to the last sequence number issued in it.
///
/// Implementations must make [`CounterStore::increment`] a single indivisible
/// read-modify-write: concurrent callers, in this process or any other process
/// sharing the same backing store, must never observe the same value for the
/// same period. A separate read followed by a write does not qualify.
pub trait CounterStore {
    /// Atomically increments the counter for `period` and returns the new
    /// value, creating the counter at 0 first if it does not exist yet. The
    /// first call for a period therefore returns 1.
    ///
    /// # Errors
    ///
    /// Returns a [`StoreError`] if the increment could not be performed. A
    /// failed call must leave the counter unchanged.
    fn increment(&self, period: Period) -> Result<u64, StoreError>;

    /// Returns the last value issued for `period`, or `None` if nothing has
    /// been allocated in it yet.
    ///
    /// The value may be stale by the time it is returned; never derive a new
    /// identifier from it.
    ///
    /// # Errors
    ///
    /// Returns a [`StoreError`] if the store cannot be read.
    fn current(&self, period: Period) -> Result<Option<u64>, StoreError>;
}

impl<S: CounterStore + ?Sized> CounterStore for &S {
    fn increment(&self, period: Period) -> Result<u64, StoreError> {
        (**self).increment(period)
    }

    fn current(&self, period: Period) -> Result<Option<u64>, StoreError> {
        (**self).current(period)
    }
}

impl<S: CounterStore + ?Sized> CounterStore for Arc<S> {
    fn increment(&self, period: Period) -> Result<u64, StoreError> {
        (**self).increment(period)
    }

    fn current(&self, period: Period) -> Result<Option<u64>, StoreError> {
        (**self).current(period)
    }
}

impl<S: CounterStore + ?Sized> CounterStore for Box<S> {
    fn increment(&self, period: Period) -> Result<u64, StoreError> {
        (**self).increment(period)
    }

    fn current(&self, period: Period) -> Result<Option<u64>, StoreError> {
        (**self).current(period)
    }
}

/// Failures reported by a [`CounterStore`].
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum StoreError {
    /// The backend could not be reached or refused the operation.
    #[error("{context}")]
    Unavailable { context: String },

    /// The counter has reached the largest value the store can hold.
    #[error("sequence for {period} is exhausted")]
    Exhausted { period: Period },

    /// A persisted counter holds a value that is not a valid sequence.
    #[error("counter for {period} holds invalid value {value}")]
    Corrupt { period: Period, value: i64 },

    #[cfg_attr(docsrs, doc(cfg(feature = "sqlite")))]
    #[cfg(feature = "sqlite")]
    #[error("sqlite: {0}")]
    Sqlite(#[from] rusqlite::Error),
}

impl StoreError {
    /// Convenience constructor for [`StoreError::Unavailable`].
    pub fn unavailable(context: impl Into<String>) -> Self {
        Self::Unavailable {
            context: context.into(),
        }
    }

    /// Returns `true` when the same call may succeed later.
    ///
    /// An exhausted or corrupt counter stays that way until an operator
    /// intervenes.
    pub const fn is_retryable(&self) -> bool {
        match self {
            Self::Unavailable { .. } => true,
            Self::Exhausted { .. } | Self::Corrupt { .. } => false,
            #[cfg(feature = "sqlite")]
            Self::Sqlite(_) => true,
        }
    }
}
