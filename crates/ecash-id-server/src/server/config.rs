use std::{net::SocketAddr, path::PathBuf, time::Duration};

use anyhow::{Context, bail};
use clap::{Parser, ValueEnum};
use ecash_id::{JournalMode, SqliteConfig, Timezone};

/// Runtime configuration for the `ecash-id-server` binary.
///
/// All values are parsed from CLI arguments or environment variables (a
/// `.env` file is loaded first), with defaults suitable for a single-node
/// deployment backed by a local SQLite file.
#[derive(Parser, Debug, Clone)]
#[command(
    name = "ecash-id-server",
    version,
    about = "An HTTP service allocating GHC-YYYY-MM-SEQ request identifiers"
)]
pub struct CliArgs {
    /// Address to listen on.
    ///
    /// Environment variable: `SERVER_ADDR`
    #[arg(long, env = "SERVER_ADDR", default_value_t = String::from("0.0.0.0:8080"))]
    pub server_addr: String,

    /// Where sequence counters are kept.
    ///
    /// `memory` loses every counter on restart and must only be used for
    /// local testing.
    ///
    /// Environment variable: `STORE`
    #[arg(long, env = "STORE", value_enum, default_value_t = StoreKind::Sqlite)]
    pub store: StoreKind,

    /// SQLite database file. Several servers may share it.
    ///
    /// Environment variable: `DATABASE_PATH`
    #[arg(long, env = "DATABASE_PATH", default_value = "ecash-ids.db")]
    pub database_path: PathBuf,

    /// How long an allocation waits for the SQLite write lock before failing.
    ///
    /// Environment variable: `SQLITE_BUSY_TIMEOUT_MS`
    #[arg(long, env = "SQLITE_BUSY_TIMEOUT_MS", default_value_t = 5_000)]
    pub sqlite_busy_timeout_ms: u64,

    /// Timezone the current month is read in. Every server sharing a
    /// database must use the same one.
    ///
    /// Environment variable: `TIMEZONE`
    #[arg(long, env = "TIMEZONE", value_enum, default_value_t = TimezoneArg::Utc)]
    pub timezone: TimezoneArg,

    /// Log output format.
    ///
    /// Environment variable: `LOG_FORMAT`
    #[arg(long, env = "LOG_FORMAT", value_enum, default_value_t = LogFormat::Pretty)]
    pub log_format: LogFormat,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreKind {
    Memory,
    Sqlite,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimezoneArg {
    Utc,
    Local,
}

impl From<TimezoneArg> for Timezone {
    fn from(arg: TimezoneArg) -> Self {
        match arg {
            TimezoneArg::Utc => Self::Utc,
            TimezoneArg::Local => Self::Local,
        }
    }
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Pretty,
    Json,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreConfig {
    Memory,
    Sqlite(SqliteConfig),
}

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub server_addr: SocketAddr,
    pub store: StoreConfig,
    pub timezone: Timezone,
    pub log_format: LogFormat,
}

impl TryFrom<CliArgs> for ServerConfig {
    type Error = anyhow::Error;

    fn try_from(args: CliArgs) -> Result<Self, Self::Error> {
        let server_addr = args
            .server_addr
            .parse::<SocketAddr>()
            .with_context(|| format!("SERVER_ADDR ({}) is not a socket address", args.server_addr))?;

        let store = match args.store {
            StoreKind::Memory => StoreConfig::Memory,
            StoreKind::Sqlite => {
                if args.database_path.as_os_str().is_empty() {
                    bail!("DATABASE_PATH must not be empty");
                }
                if args.sqlite_busy_timeout_ms == 0 {
                    bail!("SQLITE_BUSY_TIMEOUT_MS must be greater than 0");
                }
                StoreConfig::Sqlite(
                    SqliteConfig::new(args.database_path)
                        .with_busy_timeout(Duration::from_millis(args.sqlite_busy_timeout_ms))
                        .with_journal_mode(JournalMode::Wal),
                )
            }
        };

        Ok(Self {
            server_addr,
            store,
            timezone: args.timezone.into(),
            log_format: args.log_format,
        })
    }
}
