//! # Logging
//!
//! Structured logs via `tracing`, printed by `tracing_subscriber::fmt`.
//!
//! - The filter comes from `RUST_LOG` and defaults to `info`. Use
//!   `RUST_LOG=ecash_id=debug,info` to log every allocated identifier.
//! - `LOG_FORMAT=pretty` prints human-readable multi-line events;
//!   `LOG_FORMAT=json` prints one JSON object per line for log shippers.
//! - HTTP requests get a span from `tower_http::trace::TraceLayer`, so events
//!   emitted while serving a request carry its method and URI.

use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use crate::server::config::LogFormat;

pub fn init_telemetry(format: LogFormat) -> anyhow::Result<()> {
    let registry = tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()));

    match format {
        LogFormat::Pretty => registry
            .with(
                fmt::layer()
                    .with_thread_ids(true)
                    .with_line_number(true)
                    .with_target(false)
                    .with_timer(fmt::time::ChronoLocal::rfc_3339())
                    .with_file(true)
                    .pretty(),
            )
            .try_init()?,
        LogFormat::Json => registry
            .with(
                fmt::layer()
                    .with_thread_ids(true)
                    .with_timer(fmt::time::ChronoLocal::rfc_3339())
                    .json()
                    .with_current_span(true),
            )
            .try_init()?,
    }

    Ok(())
}
