use std::{path::PathBuf, time::Duration};

use parking_lot::Mutex;
use rusqlite::{Connection, OpenFlags, OptionalExtension, TransactionBehavior, params};

use crate::{CounterStore, Period, StoreError};

const SCHEMA: &str = "CREATE TABLE IF NOT EXISTS sequence_counters (
    year INTEGER NOT NULL,
    month INTEGER NOT NULL,
    current_sequence INTEGER NOT NULL,
    PRIMARY KEY (year, month)
) WITHOUT ROWID;";

// One statement: the upsert and the read of the new value cannot be split by
// another writer. A counter at i64::MAX is left alone and returns no row;
// adding one to it would silently turn the column into a REAL.
const INCREMENT: &str = "INSERT INTO sequence_counters (year, month, current_sequence)
    VALUES (?1, ?2, 1)
    ON CONFLICT (year, month) DO UPDATE SET current_sequence = current_sequence + 1
        WHERE current_sequence < 9223372036854775807
    RETURNING current_sequence";

const CURRENT: &str =
    "SELECT current_sequence FROM sequence_counters WHERE year = ?1 AND month = ?2";

/// Default busy timeout.
pub const DEFAULT_BUSY_TIMEOUT: Duration = Duration::from_millis(5_000);

/// `SQLite` journal mode.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum JournalMode {
    /// Write-ahead log; readers do not block the writer.
    #[default]
    Wal,
    /// Rollback journal.
    Delete,
}

impl JournalMode {
    pub const fn pragma_value(self) -> &'static str {
        match self {
            Self::Wal => "WAL",
            Self::Delete => "DELETE",
        }
    }
}

/// `SQLite` synchronous mode.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum SyncMode {
    /// fsync on every commit.
    #[default]
    Full,
    /// fsync at WAL checkpoints only. A power loss may roll back recent
    /// increments, which can then be issued again.
    Normal,
}

impl SyncMode {
    pub const fn pragma_value(self) -> &'static str {
        match self {
            Self::Full => "FULL",
            Self::Normal => "NORMAL",
        }
    }
}

/// Settings for [`SqliteCounterStore::open`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SqliteConfig {
    /// Database file, created if missing.
    pub path: PathBuf,
    /// How long a write waits for another connection's lock before failing
    /// with [`StoreError::Sqlite`].
    pub busy_timeout: Duration,
    pub journal_mode: JournalMode,
    pub sync_mode: SyncMode,
}

impl SqliteConfig {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            busy_timeout: DEFAULT_BUSY_TIMEOUT,
            journal_mode: JournalMode::default(),
            sync_mode: SyncMode::default(),
        }
    }

    #[must_use]
    pub const fn with_busy_timeout(mut self, busy_timeout: Duration) -> Self {
        self.busy_timeout = busy_timeout;
        self
    }

    #[must_use]
    pub const fn with_journal_mode(mut self, journal_mode: JournalMode) -> Self {
        self.journal_mode = journal_mode;
        self
    }

    #[must_use]
    pub const fn with_sync_mode(mut self, sync_mode: SyncMode) -> Self {
        self.sync_mode = sync_mode;
        self
    }
}

/// A durable [`CounterStore`] backed by a `SQLite` table.
///
/// Every increment is a single `INSERT ... ON CONFLICT DO UPDATE ...
/// RETURNING` statement, so it either commits and yields the new value or
/// leaves the row untouched. Any number of stores, in any number of
/// processes, may open the same database file; `SQLite`'s write lock
/// serializes their increments.
///
/// The connection is guarded by a mutex, so one store serializes its own
/// callers. Open several stores on the same file for parallel writers.
#[derive(Debug)]
pub struct SqliteCounterStore {
    conn: Mutex<Connection>,
}

impl SqliteCounterStore {
    /// Opens (or creates) the database described by `config`.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Sqlite`] if the file cannot be opened, a pragma
    /// is rejected, or the schema cannot be created.
    pub fn open(config: &SqliteConfig) -> Result<Self, StoreError> {
        let flags = OpenFlags::SQLITE_OPEN_READ_WRITE
            | OpenFlags::SQLITE_OPEN_CREATE
            | OpenFlags::SQLITE_OPEN_NO_MUTEX;
        let conn = Connection::open_with_flags(&config.path, flags)?;
        conn.busy_timeout(config.busy_timeout)?;
        // `journal_mode` answers with the mode actually in effect.
        conn.pragma_update_and_check(
            None,
            "journal_mode",
            config.journal_mode.pragma_value(),
            |row| row.get::<_, String>(0),
        )?;
        conn.pragma_update(None, "synchronous", config.sync_mode.pragma_value())?;
        Self::from_connection(conn)
    }

    /// Opens a private in-memory database. Counters are lost when the store
    /// is dropped.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Sqlite`] if the schema cannot be created.
    pub fn open_in_memory() -> Result<Self, StoreError> {
        Self::from_connection(Connection::open_in_memory()?)
    }

    fn from_connection(conn: Connection) -> Result<Self, StoreError> {
        conn.execute_batch(SCHEMA)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }
}

impl CounterStore for SqliteCounterStore {
    fn increment(&self, period: Period) -> Result<u64, StoreError> {
        let mut conn = self.conn.lock();
        // Dropping the transaction without committing rolls the increment
        // back, which is what happens when the stored value is corrupt.
        let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;
        let value: i64 = tx
            .query_row(INCREMENT, params![period.year(), period.month()], |row| row.get(0))
            .optional()?
            .ok_or(StoreError::Exhausted { period })?;
        let sequence = to_sequence(period, value)?;
        tx.commit()?;
        Ok(sequence)
    }

    fn current(&self, period: Period) -> Result<Option<u64>, StoreError> {
        let conn = self.conn.lock();
        let value: Option<i64> = conn
            .query_row(CURRENT, params![period.year(), period.month()], |row| row.get(0))
            .optional()?;
        value.map(|value| to_sequence(period, value)).transpose()
    }
}

fn to_sequence(period: Period, value: i64) -> Result<u64, StoreError> {
    match u64::try_from(value) {
        Ok(sequence) if sequence > 0 => Ok(sequence),
        _ => Err(StoreError::Corrupt { period, value }),
    }
}

#[cfg(test)]
mod tests {
    use std::thread::scope;

    use super::*;

    fn period(year: u16, month: u8) -> Period {
        Period::new(year, month).unwrap()
    }

    #[test]
    fn counters_survive_reopening() {
        let dir = tempfile::tempdir().unwrap();
        let config = SqliteConfig::new(dir.path().join("ids.db"));
        let march = period(2025, 3);

        {
            let store = SqliteCounterStore::open(&config).unwrap();
            assert_eq!(store.increment(march).unwrap(), 1);
            assert_eq!(store.increment(march).unwrap(), 2);
        }

        let store = SqliteCounterStore::open(&config).unwrap();
        assert_eq!(store.current(march).unwrap(), Some(2));
        assert_eq!(store.increment(march).unwrap(), 3);
    }

    #[test]
    fn stores_sharing_a_file_never_issue_duplicates() {
        const STORES: usize = 4;
        const PER_STORE: u64 = 50;

        let dir = tempfile::tempdir().unwrap();
        let config = SqliteConfig::new(dir.path().join("ids.db"))
            .with_busy_timeout(Duration::from_secs(30))
            .with_sync_mode(SyncMode::Normal);
        let march = period(2025, 3);

        let stores: Vec<_> = (0..STORES)
            .map(|_| SqliteCounterStore::open(&config).unwrap())
            .collect();

        let mut issued: Vec<u64> = scope(|s| {
            let handles: Vec<_> = stores
                .iter()
                .map(|store| {
                    s.spawn(move || {
                        (0..PER_STORE)
                            .map(|_| store.increment(march).unwrap())
                            .collect::<Vec<_>>()
                    })
                })
                .collect();
            handles
                .into_iter()
                .flat_map(|handle| handle.join().unwrap())
                .collect()
        });

        issued.sort_unstable();
        let expected: Vec<u64> = (1..=STORES as u64 * PER_STORE).collect();
        assert_eq!(issued, expected);
    }

    #[test]
    fn rejects_corrupt_rows() {
        let store = SqliteCounterStore::open_in_memory().unwrap();
        let march = period(2025, 3);
        store
            .conn
            .lock()
            .execute(
                "INSERT INTO sequence_counters (year, month, current_sequence) VALUES (?1, ?2, -5)",
                params![march.year(), march.month()],
            )
            .unwrap();

        assert!(matches!(
            store.current(march),
            Err(StoreError::Corrupt { value: -5, .. })
        ));
        assert!(matches!(
            store.increment(march),
            Err(StoreError::Corrupt { value: -4, .. })
        ));
        // The failed increment was rolled back.
        assert!(matches!(
            store.current(march),
            Err(StoreError::Corrupt { value: -5, .. })
        ));
    }

    #[test]
    fn saturated_counters_are_exhausted() {
        let store = SqliteCounterStore::open_in_memory().unwrap();
        let march = period(2025, 3);
        store
            .conn
            .lock()
            .execute(
                "INSERT INTO sequence_counters (year, month, current_sequence) VALUES (?1, ?2, ?3)",
                params![march.year(), march.month(), i64::MAX],
            )
            .unwrap();

        let err = store.increment(march).unwrap_err();
        assert!(matches!(err, StoreError::Exhausted { period } if period == march));
        assert!(!err.is_retryable());
        assert_eq!(store.current(march).unwrap(), Some(i64::MAX as u64));

        // Other periods are unaffected.
        assert_eq!(store.increment(period(2025, 4)).unwrap(), 1);
    }

    #[test]
    fn journal_modes_render_pragmas() {
        assert_eq!(JournalMode::Wal.pragma_value(), "WAL");
        assert_eq!(SyncMode::Normal.pragma_value(), "NORMAL");
    }
}
