//! The Verifier's verdict type (spec.md §4.2 "Failure semantics").

/// The outcome of [`crate::verifier::Verifier::verify`]: never an error, a
/// total `{valid, invalid(reason)}` pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VerifierVerdict {
    /// Every check passed.
    Valid,
    /// The first check that failed, as a human-readable reason.
    Invalid(String),
}

impl VerifierVerdict {
    pub(crate) fn invalid(reason: impl Into<String>) -> Self {
        VerifierVerdict::Invalid(reason.into())
    }

    /// `true` for [`VerifierVerdict::Valid`].
    pub fn is_valid(&self) -> bool {
        matches!(self, VerifierVerdict::Valid)
    }
}
