use std::sync::Arc;

use ecash_id::{
    CounterStore, MemoryCounterStore, PeriodSource, SequenceGenerator, SqliteCounterStore,
    SystemClock,
};

use crate::server::config::{ServerConfig, StoreConfig};

/// Store type chosen at startup.
pub type SharedStore = Arc<dyn CounterStore + Send + Sync>;

/// Clock type chosen at startup.
pub type SharedClock = Arc<dyn PeriodSource + Send + Sync>;

/// The generator every handler allocates from.
pub type Generator = SequenceGenerator<SharedStore, SharedClock>;

/// State shared by all handlers.
///
/// Cloning is cheap; all clones allocate from the same store.
#[derive(Clone)]
pub struct AppState {
    generator: Arc<Generator>,
}

impl AppState {
    pub fn new(store: SharedStore, clock: SharedClock) -> Self {
        Self {
            generator: Arc::new(SequenceGenerator::new(store, clock)),
        }
    }

    /// Opens the configured store and pairs it with the system clock.
    ///
    /// # Errors
    ///
    /// Fails if the SQLite database cannot be opened or initialized.
    pub fn from_config(config: &ServerConfig) -> anyhow::Result<Self> {
        let store: SharedStore = match &config.store {
            StoreConfig::Memory => {
                tracing::warn!("using the in-memory store; counters are lost on restart");
                Arc::new(MemoryCounterStore::new())
            }
            StoreConfig::Sqlite(sqlite) => {
                tracing::info!(path = %sqlite.path.display(), "opening sqlite store");
                Arc::new(SqliteCounterStore::open(sqlite)?)
            }
        };
        let clock: SharedClock = Arc::new(SystemClock::with_timezone(config.timezone));
        Ok(Self::new(store, clock))
    }

    pub fn generator(&self) -> &Arc<Generator> {
        &self.generator
    }
}
