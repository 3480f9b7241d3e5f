//! The Verification Service's output (spec.md §4.4 step 5).

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};

use sage_types::CapabilityValue;

/// The answer to "is this message authentically from this agent?".
#[derive(Debug, Clone, PartialEq)]
pub struct VerificationResult {
    /// `true` iff every check in the pipeline passed.
    pub valid: bool,
    /// Set iff `valid` is `false`: a human-readable rejection reason.
    pub error: Option<String>,
    /// The agent's DID, as a string, once resolved.
    pub agent_id: Option<String>,
    /// The agent's on-chain name.
    pub agent_name: Option<String>,
    /// The chain-native address owning this agent's registration.
    pub agent_owner: Option<String>,
    /// The agent's on-chain capability map, regardless of verdict.
    pub capabilities: BTreeMap<String, CapabilityValue>,
    /// When this verdict was produced.
    pub verified_at: DateTime<Utc>,
}

impl VerificationResult {
    /// A failed verdict produced before (or without) resolving agent metadata.
    pub fn rejected(reason: impl Into<String>, verified_at: DateTime<Utc>) -> Self {
        VerificationResult {
            valid: false,
            error: Some(reason.into()),
            agent_id: None,
            agent_name: None,
            agent_owner: None,
            capabilities: BTreeMap::new(),
            verified_at,
        }
    }
}
