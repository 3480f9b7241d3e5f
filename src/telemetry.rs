//! `tracing` subscriber initialization for binaries that embed this crate.
//!
//! The kernel itself only emits `tracing` events (spec.md ambient logging
//! surface, SPEC_FULL.md §1) — it never installs a subscriber, since a
//! library should not decide how its host process logs. This module is a
//! convenience for a composition root that wants the reference workspace's
//! behavior: an `EnvFilter` driven by `RUST_LOG`, defaulting to `info` when
//! unset.

use tracing_subscriber::EnvFilter;

/// Installs a global `tracing` subscriber reading its filter from `RUST_LOG`,
/// defaulting to `info` when the variable is unset or invalid.
///
/// Returns an error rather than panicking if a subscriber is already
/// installed — unlike the reference workspace's `main`, which expects to be
/// the only caller and panics on failure, this is a library entry point a
/// caller may invoke more than once (e.g. in test setup).
pub fn init_tracing() -> Result<(), tracing_subscriber::util::TryInitError> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::FmtSubscriber::builder().with_env_filter(filter).try_init()
}
