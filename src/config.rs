//! Composition-root configuration for the trust kernel (SPEC_FULL.md §3).
//!
//! Per spec.md §9's "Global initialization registry" note, the kernel takes
//! configuration as constructed Rust values handed in by its caller — there
//! is no env-var or file parsing here, unlike the reference workspace's
//! `Config`/`CliArgs` (`clap` + `serde` + a JSON file). An outer application
//! is expected to populate these structs from whatever config source it
//! likes and pass them to [`sage_resolver::Resolver::new`],
//! [`sage_validator::Validator::new`], and
//! [`sage_verify::VerificationOptions`].

use std::time::Duration;

use chrono::Duration as ChronoDuration;

/// Resolver construction knobs (spec.md §4.3, §7 "Recovery policy").
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResolverConfig {
    /// Upper bound on the number of cached [`sage_types::AgentMetadata`] entries.
    pub max_cache_items: usize,
    /// How long a cached entry remains valid after insertion.
    pub cache_ttl: Duration,
    /// How many times a backend call is retried on transient failure.
    pub max_retries: u32,
    /// The fixed delay between retry attempts (spec.md §7: "fixed 5-second backoff").
    pub retry_backoff: Duration,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        ResolverConfig {
            max_cache_items: 10_000,
            cache_ttl: Duration::from_secs(300),
            max_retries: 3,
            retry_backoff: Duration::from_secs(5),
        }
    }
}

/// Validator construction knobs (spec.md §4.6).
///
/// Defaults here are illustrative, not prescribed by spec.md — the one
/// exception is any figure a concrete scenario in spec.md §8 pins down
/// (e.g. S5's `MaxOutOfOrderWindow = 50ms`), which tests exercise directly
/// rather than relying on this struct's default.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ValidatorConfig {
    /// How long an accepted nonce is tracked before it may be reused.
    pub nonce_ttl: Duration,
    /// How long an accepted packet hash is tracked before it may recur.
    pub duplicate_ttl: Duration,
    /// Maximum allowed drift between now and a packet's claimed timestamp.
    pub timestamp_tolerance: Duration,
    /// How far back (wall-clock) a later-timestamped predecessor still
    /// makes a packet out of order.
    pub max_out_of_order_window: Duration,
    /// How often the periodic cleanup task should run.
    pub cleanup_interval: Duration,
}

impl ValidatorConfig {
    /// [`sage_validator::Validator::new`] takes its timestamp tolerance as
    /// a `chrono::Duration`; this crate's configs store plain
    /// `std::time::Duration` throughout, so this converts at the one call
    /// site that needs it.
    pub fn timestamp_tolerance(&self) -> ChronoDuration {
        ChronoDuration::from_std(self.timestamp_tolerance).unwrap_or(ChronoDuration::MAX)
    }
}

impl Default for ValidatorConfig {
    fn default() -> Self {
        ValidatorConfig {
            nonce_ttl: Duration::from_secs(300),
            duplicate_ttl: Duration::from_secs(300),
            timestamp_tolerance: Duration::from_secs(30),
            max_out_of_order_window: Duration::from_millis(500),
            cleanup_interval: Duration::from_secs(60),
        }
    }
}

/// Per-call [`sage_verify::VerificationOptions`] defaults (spec.md §4.4 "Inputs").
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VerificationConfig {
    /// If `true`, a deactivated agent is rejected rather than verified.
    pub require_active_agent: bool,
    /// Maximum allowed drift between now and a message's claimed timestamp.
    /// `None` disables the check entirely (spec.md §4.2 "Timestamp check").
    pub max_clock_skew: Option<Duration>,
}

impl Default for VerificationConfig {
    fn default() -> Self {
        VerificationConfig {
            require_active_agent: true,
            max_clock_skew: Some(Duration::from_secs(300)),
        }
    }
}

impl From<VerificationConfig> for sage_verify::VerificationOptions {
    fn from(config: VerificationConfig) -> Self {
        sage_verify::VerificationOptions {
            require_active_agent: config.require_active_agent,
            max_clock_skew: config.max_clock_skew,
            verify_metadata: false,
            required_capabilities: Vec::new(),
            signature_name: None,
        }
    }
}
