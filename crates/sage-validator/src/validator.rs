//! Per-session replay, freshness, and ordering checks (spec.md §4.6).
//!
//! Session state is kept in a sharded [`dashmap::DashMap`] — the same tool
//! `x402-rs`'s per-address nonce manager uses for a mutable map shared
//! across clones — rather than one `RwLock` over the whole table, so
//! unrelated sessions validate concurrently without contending on a single
//! lock.

use std::collections::HashMap;
use std::time::{Duration as StdDuration, Instant};

use chrono::{DateTime, Duration as ChronoDuration, Utc};
use dashmap::DashMap;

use crate::outcome::{ValidationFailure, ValidationOutcome};

/// One inbound packet to validate.
#[derive(Debug, Clone)]
pub struct PacketCheck<'a> {
    /// Scopes replay/ordering state to one conversation.
    pub session_id: &'a str,
    /// Single-use freshness token supplied by the sender.
    pub nonce: &'a str,
    /// A content fingerprint of the packet payload, supplied by the caller.
    pub packet_hash: &'a str,
    /// The sender-claimed send time.
    pub timestamp: DateTime<Utc>,
}

#[derive(Default)]
struct SessionState {
    nonces: HashMap<String, Instant>,
    packet_hashes: HashMap<String, Instant>,
    /// The highest message timestamp accepted so far, for the ordering check.
    max_accepted_timestamp: Option<DateTime<Utc>>,
    /// When that acceptance was processed (wall-clock), bounding how far back
    /// `MaxOutOfOrderWindow` looks.
    last_accepted_at: Option<Instant>,
}

/// Validates inbound packets against per-session replay, freshness, and
/// ordering rules, short-circuiting on the first failed check with no
/// state mutation (spec.md §4.6 invariants).
pub struct Validator {
    sessions: DashMap<String, SessionState>,
    /// How far `|now - packet.timestamp|` may drift before rejection.
    timestamp_tolerance: ChronoDuration,
    /// How recently (wall-clock) the previous acceptance must have happened
    /// for a later-timestamped predecessor to make this packet out of order.
    max_out_of_order_window: StdDuration,
    nonce_ttl: StdDuration,
    duplicate_ttl: StdDuration,
}

impl Validator {
    /// Builds a validator with the given check tolerances and TTLs.
    pub fn new(
        timestamp_tolerance: ChronoDuration,
        max_out_of_order_window: StdDuration,
        nonce_ttl: StdDuration,
        duplicate_ttl: StdDuration,
    ) -> Self {
        Validator {
            sessions: DashMap::new(),
            timestamp_tolerance,
            max_out_of_order_window,
            nonce_ttl,
            duplicate_ttl,
        }
    }

    /// Runs the check order from spec.md §4.6 against `packet`, mutating
    /// this session's tracking state only on acceptance.
    pub fn validate(&self, packet: &PacketCheck<'_>) -> ValidationOutcome {
        let now = Utc::now();
        let now_instant = Instant::now();
        let mut session = self.sessions.entry(packet.session_id.to_string()).or_default();

        if (now - packet.timestamp).abs() > self.timestamp_tolerance {
            tracing::warn!(session = packet.session_id, "packet rejected: timestamp outside tolerance");
            return ValidationOutcome::Rejected(ValidationFailure::TimestampOutsideTolerance);
        }

        if let Some(expires_at) = session.nonces.get(packet.nonce) {
            if *expires_at > now_instant {
                tracing::warn!(session = packet.session_id, "packet rejected: replayed nonce");
                return ValidationOutcome::Rejected(ValidationFailure::Replay);
            }
        }

        if let (Some(max_ts), Some(last_at)) = (session.max_accepted_timestamp, session.last_accepted_at) {
            let within_window = now_instant.duration_since(last_at) <= self.max_out_of_order_window;
            if within_window && max_ts > packet.timestamp {
                tracing::warn!(session = packet.session_id, "packet rejected: out of order");
                return ValidationOutcome::Rejected(ValidationFailure::OutOfOrder);
            }
        }

        if let Some(expires_at) = session.packet_hashes.get(packet.packet_hash) {
            if *expires_at > now_instant {
                tracing::warn!(session = packet.session_id, "packet rejected: duplicate payload");
                return ValidationOutcome::Rejected(ValidationFailure::Duplicate);
            }
        }

        session
            .nonces
            .insert(packet.nonce.to_string(), now_instant + self.nonce_ttl);
        session
            .packet_hashes
            .insert(packet.packet_hash.to_string(), now_instant + self.duplicate_ttl);
        session.max_accepted_timestamp = Some(match session.max_accepted_timestamp {
            Some(existing) if existing > packet.timestamp => existing,
            _ => packet.timestamp,
        });
        session.last_accepted_at = Some(now_instant);

        tracing::debug!(session = packet.session_id, "packet accepted");
        ValidationOutcome::Accepted
    }

    /// Purges expired nonce and packet-hash entries across every session.
    /// Safe to call periodically; each session's scan only holds that
    /// session's shard lock, never the whole table.
    pub fn cleanup(&self) {
        let now = Instant::now();
        self.sessions.iter_mut().for_each(|mut session| {
            session.nonces.retain(|_, expires_at| *expires_at > now);
            session.packet_hashes.retain(|_, expires_at| *expires_at > now);
        });
        self.sessions.retain(|_, session| {
            !session.nonces.is_empty()
                || !session.packet_hashes.is_empty()
                || session.last_accepted_at.is_some_and(|at| now.duration_since(at) < self.max_out_of_order_window)
        });
    }

    /// The number of sessions currently tracked. Exposed for tests and
    /// memory-bound monitoring.
    pub fn session_count(&self) -> usize {
        self.sessions.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread::sleep;

    fn validator() -> Validator {
        Validator::new(
            ChronoDuration::milliseconds(500),
            StdDuration::from_millis(50),
            StdDuration::from_secs(60),
            StdDuration::from_secs(60),
        )
    }

    #[test]
    fn s4_replay_same_nonce_rejected_second_time() {
        let v = validator();
        let now = Utc::now();
        let packet = PacketCheck {
            session_id: "s1",
            nonce: "n1",
            packet_hash: "h1",
            timestamp: now,
        };
        assert_eq!(v.validate(&packet), ValidationOutcome::Accepted);

        let replay = PacketCheck {
            packet_hash: "h2",
            ..packet
        };
        assert_eq!(
            v.validate(&replay),
            ValidationOutcome::Rejected(ValidationFailure::Replay)
        );
    }

    #[test]
    fn s5_out_of_order_packet_rejected_within_window() {
        let v = validator();
        let now = Utc::now();
        let first = PacketCheck {
            session_id: "s1",
            nonce: "n1",
            packet_hash: "h1",
            timestamp: now,
        };
        assert_eq!(v.validate(&first), ValidationOutcome::Accepted);

        let earlier = PacketCheck {
            session_id: "s1",
            nonce: "n2",
            packet_hash: "h2",
            timestamp: now - ChronoDuration::milliseconds(100),
        };
        assert_eq!(
            v.validate(&earlier),
            ValidationOutcome::Rejected(ValidationFailure::OutOfOrder)
        );
    }

    #[test]
    fn timestamp_outside_tolerance_is_rejected_before_other_checks() {
        let v = validator();
        let stale = PacketCheck {
            session_id: "s1",
            nonce: "n1",
            packet_hash: "h1",
            timestamp: Utc::now() - ChronoDuration::seconds(5),
        };
        assert_eq!(
            v.validate(&stale),
            ValidationOutcome::Rejected(ValidationFailure::TimestampOutsideTolerance)
        );
        assert_eq!(v.session_count(), 1, "entering the map is fine; no nonce/hash was recorded");
    }

    #[test]
    fn duplicate_payload_rejected_even_with_fresh_nonce() {
        let v = validator();
        let now = Utc::now();
        let first = PacketCheck {
            session_id: "s1",
            nonce: "n1",
            packet_hash: "shared-hash",
            timestamp: now,
        };
        assert_eq!(v.validate(&first), ValidationOutcome::Accepted);

        let second = PacketCheck {
            session_id: "s1",
            nonce: "n2",
            packet_hash: "shared-hash",
            timestamp: now,
        };
        assert_eq!(
            v.validate(&second),
            ValidationOutcome::Rejected(ValidationFailure::Duplicate)
        );
    }

    #[test]
    fn failed_validation_does_not_mutate_tracking_state() {
        let v = validator();
        let now = Utc::now();
        let first = PacketCheck {
            session_id: "s1",
            nonce: "n1",
            packet_hash: "h1",
            timestamp: now,
        };
        v.validate(&first);

        let replay = PacketCheck {
            packet_hash: "h2",
            ..first
        };
        v.validate(&replay);

        // Re-submitting the same still-fresh hash after the rejected replay
        // must still be caught as a duplicate, proving h1 was never touched
        // by the failed call.
        let dup = PacketCheck {
            nonce: "n3",
            ..first
        };
        assert_eq!(
            v.validate(&dup),
            ValidationOutcome::Rejected(ValidationFailure::Duplicate)
        );
    }

    #[test]
    fn different_sessions_are_independent() {
        let v = validator();
        let now = Utc::now();
        let a = PacketCheck {
            session_id: "a",
            nonce: "shared-nonce",
            packet_hash: "h-a",
            timestamp: now,
        };
        let b = PacketCheck {
            session_id: "b",
            nonce: "shared-nonce",
            packet_hash: "h-b",
            timestamp: now,
        };
        assert_eq!(v.validate(&a), ValidationOutcome::Accepted);
        assert_eq!(v.validate(&b), ValidationOutcome::Accepted);
    }

    #[test]
    fn cleanup_purges_expired_nonces() {
        let v = Validator::new(
            ChronoDuration::seconds(60),
            StdDuration::from_millis(50),
            StdDuration::from_millis(5),
            StdDuration::from_millis(5),
        );
        let now = Utc::now();
        let packet = PacketCheck {
            session_id: "s1",
            nonce: "n1",
            packet_hash: "h1",
            timestamp: now,
        };
        v.validate(&packet);
        sleep(StdDuration::from_millis(20));
        v.cleanup();

        // the nonce TTL has lapsed, so the same nonce is accepted again
        let replay_after_ttl = PacketCheck {
            session_id: "s1",
            nonce: "n1",
            packet_hash: "h2",
            timestamp: Utc::now(),
        };
        assert_eq!(v.validate(&replay_after_ttl), ValidationOutcome::Accepted);
    }
}
