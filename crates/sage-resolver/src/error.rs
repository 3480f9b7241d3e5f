//! Lookup-error taxonomy for DID resolution (spec.md §7).
//!
//! These are raised, not verdicts — except that `sage-verify`'s
//! orchestration layer downgrades `NotFound` and `InactiveAgent` to a
//! `valid=false` [`VerificationResult`](https://docs.rs/sage-verify)
//! rather than propagating them. `sage-resolver` itself always raises them.

use thiserror::Error;

use sage_types::DidError;

/// A DID could not be resolved to agent metadata.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ResolverError {
    /// The DID string does not parse per spec.md §3.
    #[error(transparent)]
    InvalidDidFormat(#[from] DidError),
    /// The DID's chain segment parsed, but no resolver handles that chain token.
    #[error("unknown chain: {0}")]
    UnknownChain(String),
    /// The DID's chain is recognized, but no resolver is registered for it.
    #[error("no resolver configured for chain: {0}")]
    ChainNotConfigured(String),
    /// No backend (of those queried) had a registration for this DID.
    #[error("no agent registered for DID: {0}")]
    NotFound(String),
    /// The resolved agent exists but is deactivated, and the caller
    /// requested only active agents' keys.
    #[error("agent is deactivated: {0}")]
    InactiveAgent(String),
    /// A backend call failed after exhausting its configured retries.
    #[error("chain backend unavailable: {0}")]
    BackendUnavailable(String),
    /// The caller's deadline/cancellation token fired before resolution completed.
    #[error("resolution cancelled")]
    Cancelled,
}
