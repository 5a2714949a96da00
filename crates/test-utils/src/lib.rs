//! Test utilities for the timestamps workspace.
//!
//! This crate provides helpers to set up a migrated in-memory store, route tracing output
//! through the test harness, and build fixed instants for deterministic stamping.

use core::num::NonZeroU32;

use chrono::{DateTime, FixedOffset};
use timestamps_domain::{Moment, flavor::Flavor, parse_iso8601};
use timestamps_store::{DbPool, TimestampStore, establish_pool};
use tracing_subscriber::EnvFilter;

// HELPERS
// ================================================================================================

/// Create a pool over a fresh in-memory SQLite database, without any table.
///
/// The pool holds a single connection, since every connection to `:memory:` opens a
/// database of its own.
pub fn in_memory_pool() -> DbPool {
    establish_pool(":memory:", NonZeroU32::MIN).expect("failed to establish pool")
}

/// Create a [`TimestampStore`] backed by a fresh in-memory SQLite database.
///
/// Migrations are applied before the store is returned.
pub fn in_memory_store() -> TimestampStore {
    let store = TimestampStore::new(in_memory_pool());
    store.migrate().expect("failed to run migrations");

    store
}

/// Install a tracing subscriber writing through the test harness.
///
/// Safe to call from every test; only the first call installs the subscriber.
pub fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug"));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_test_writer()
        .with_line_number(true)
        .try_init();
}

/// Parse an ISO-8601 date-time, panicking on malformed input.
pub fn instant(s: &str) -> DateTime<FixedOffset> {
    parse_iso8601(s).unwrap_or_else(|err| panic!("invalid instant {s:?}: {err}"))
}

/// Parse an ISO-8601 date-time into a [`Moment`], panicking on malformed input.
pub fn moment(s: &str) -> Moment {
    Moment::new(instant(s))
}

/// Parse an ISO-8601 date-time into a value of flavor `F`, panicking on malformed input.
pub fn stamp_at<F: Flavor>(s: &str) -> F::Value {
    F::wrap(instant(s)).unwrap_or_else(|err| panic!("{s:?} does not fit {}: {err}", F::NAME))
}
