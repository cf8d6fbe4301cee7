// src/logging.rs
//! Tracing setup and the `app_log!` call-site macro

use anyhow::{Context, Result};
use std::fs::OpenOptions;
use std::path::Path;
use std::sync::Arc;

use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter};

// `app_log!` and `app_span!` keep the call-site shape of the `graflog` macros
// but expand to `tracing` directly, so no extra logging crate is needed.

/// Log through `tracing` at the given level: `app_log!(info, "...", args)`.
#[macro_export]
macro_rules! app_log {
    ($level:ident, $($arg:tt)+) => {
        ::tracing::$level!($($arg)+)
    };
}

/// Open a span at info level: `app_span!("name", field = %value)`.
#[macro_export]
macro_rules! app_span {
    ($name:expr $(, $($fields:tt)*)?) => {
        ::tracing::info_span!($name $(, $($fields)*)?)
    };
}

/// Install the JSON file subscriber. The log file is truncated on startup.
///
/// `RUST_LOG` narrows the filter; without it `default_directive` applies.
pub fn init_logging(log_path: &Path, default_directive: &str) -> Result<()> {
    let file = OpenOptions::new()
        .create(true)
        .write(true)
        .truncate(true)
        .open(log_path)
        .with_context(|| format!("Failed to open log file: {}", log_path.display()))?;

    let filter = EnvFilter::try_from_default_env().or_else(|_| {
        EnvFilter::try_new(default_directive)
            .with_context(|| format!("Invalid log directive: {}", default_directive))
    })?;

    tracing_subscriber::registry()
        .with(
            fmt::layer()
                .json()
                .with_writer(Arc::new(file))
                .with_current_span(false)
                .with_span_list(false),
        )
        .with(filter)
        .try_init()
        .context("Failed to install tracing subscriber")?;

    Ok(())
}
