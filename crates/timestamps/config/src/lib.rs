//! # Configuration
//!
//! The workspace is configured through:
//! - Base configuration file (`base_config.ron`)
//! - Environment variables prefixed with `TIMESTAMPS_` (override base config)
//!
//! ## Base Configuration
//!
//! ```ron
//! Config(
//!     db: DbConfig(
//!         db_url: "timestamps.sqlite3",
//!         max_conn: 4,
//!     ),
//!     field: FieldContext(
//!         convert_dates: true,
//!         timezone: None,
//!     ),
//! )
//! ```
//!
//! ## Environment Variable Overrides
//!
//! Use double underscores (`__`) to override nested configuration fields:
//!
//! ```bash
//! export TIMESTAMPS_DB__DB_URL="./records.sqlite3"
//! export TIMESTAMPS_DB__MAX_CONN="8"
//! export TIMESTAMPS_FIELD__TIMEZONE="Europe/Berlin"
//! ```
//!
//! # Logging
//!
//! Logging is controlled via the `RUST_LOG` environment variable. Defaults to `info` level.

mod settings;

pub use self::settings::{Config, DbConfig, get_configuration};

use tracing::{
    Subscriber,
    subscriber::{self, SetGlobalDefaultError},
};
use tracing_subscriber::{EnvFilter, Registry, fmt::format::FmtSpan, layer::SubscriberExt};

/// Installs the subscriber of [`make_tracing_subscriber`] as the global default, filtered by
/// `RUST_LOG`.
///
/// # Errors
///
/// Returns an error if a global subscriber was already installed.
pub fn init_tracing() -> Result<(), SetGlobalDefaultError> {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    subscriber::set_global_default(make_tracing_subscriber(env_filter))
}

/// Builds the subscriber: a `fmt` layer with line numbers and span open/close events.
pub fn make_tracing_subscriber(env_filter: EnvFilter) -> impl Subscriber {
    Registry::default()
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_line_number(true)
                .with_span_events(FmtSpan::NEW | FmtSpan::CLOSE),
        )
        .with(env_filter)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn subscriber_honors_the_filter() {
        let subscriber = make_tracing_subscriber(EnvFilter::new("warn"));

        tracing::subscriber::with_default(subscriber, || {
            assert!(tracing::enabled!(tracing::Level::WARN));
            assert!(!tracing::enabled!(tracing::Level::INFO));
        });
    }
}
