//! The validator's verdict type (spec.md §7 "Trust errors (verdict, not
//! exception)"). `ValidationFailure` is deliberately not a `thiserror::Error`
//! impl — it is carried inside [`ValidationOutcome`], never raised as `Err`.

use std::fmt;

/// Why an inbound packet was rejected, in the check order the validator
/// applies (spec.md §4.6).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationFailure {
    /// `|now - timestamp|` exceeded the session's configured tolerance.
    TimestampOutsideTolerance,
    /// The nonce is already tracked (not yet expired) for this session.
    Replay,
    /// A later-timestamped packet was already accepted for this session,
    /// within `MaxOutOfOrderWindow`.
    OutOfOrder,
    /// The packet hash is already tracked (not yet expired) for this session.
    Duplicate,
}

impl fmt::Display for ValidationFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            ValidationFailure::TimestampOutsideTolerance => "timestamp outside tolerance",
            ValidationFailure::Replay => "replayed nonce",
            ValidationFailure::OutOfOrder => "out of order",
            ValidationFailure::Duplicate => "duplicate payload",
        };
        f.write_str(label)
    }
}

/// The result of validating one inbound packet.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationOutcome {
    /// The packet passed every check; tracking state has been updated.
    Accepted,
    /// The packet failed a check; tracking state is unchanged.
    Rejected(ValidationFailure),
}

impl ValidationOutcome {
    /// `true` for [`ValidationOutcome::Accepted`].
    pub fn is_accepted(&self) -> bool {
        matches!(self, ValidationOutcome::Accepted)
    }
}
