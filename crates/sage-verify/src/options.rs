//! Per-call verification knobs (spec.md §4.4 "Inputs").

use std::time::Duration;

/// Options governing one [`crate::service::VerificationService::verify`] call.
#[derive(Debug, Clone)]
pub struct VerificationOptions {
    /// If `true`, a deactivated agent is rejected with `reason = "deactivated"`.
    pub require_active_agent: bool,
    /// Maximum allowed drift between now and the message's claimed
    /// timestamp. `None` or zero disables the check.
    pub max_clock_skew: Option<Duration>,
    /// If `true`, the message's metadata must match the agent's on-chain
    /// `endpoint`/`name` fields.
    pub verify_metadata: bool,
    /// Capability keys the agent's on-chain capabilities must satisfy.
    pub required_capabilities: Vec<String>,
    /// Which of a message's several possible signatures to check, if the
    /// envelope carries more than one. Unused by the single-signature
    /// [`sage_types::Message`] model this crate consumes today; reserved for
    /// a future multi-signature envelope.
    pub signature_name: Option<String>,
}

impl Default for VerificationOptions {
    fn default() -> Self {
        VerificationOptions {
            require_active_agent: true,
            max_clock_skew: None,
            verify_metadata: false,
            required_capabilities: Vec::new(),
            signature_name: None,
        }
    }
}
