//! Errors this crate propagates rather than folding into a verdict.
//!
//! [`Verifier::verify`](crate::verifier::Verifier::verify) deliberately does
//! *not* produce this type for malformed signatures or keys — those become a
//! [`VerifierVerdict::Invalid`](crate::outcome::VerifierVerdict::Invalid),
//! per spec.md §4.2. `VerifyError` covers the two things that are
//! genuinely exceptional: a caller-level RFC-9421 component request that
//! cannot be resolved (`sage-canon`'s consistency errors), and a resolver
//! backend/lookup failure other than `NotFound` (which the orchestrator
//! downgrades to a verdict itself, per spec.md §7).

use thiserror::Error;

use sage_canon::CanonError;
use sage_crypto::CryptoError;
use sage_resolver::ResolverError;

/// An error raised by this crate's entry points, as distinct from a trust verdict.
#[derive(Debug, Error)]
pub enum VerifyError {
    /// Raised only by [`crate::verifier::verify_http_signature`], which
    /// builds an RFC-9421 base directly rather than going through a
    /// [`sage_types::Message`].
    #[error(transparent)]
    Canon(#[from] CanonError),
    /// Raised only by [`crate::verifier::verify_http_signature`]; the
    /// `Message`-oriented path folds this into a verdict instead.
    #[error(transparent)]
    Crypto(#[from] CryptoError),
    /// A resolver lookup failed for a reason other than `NotFound`.
    #[error(transparent)]
    Resolver(#[from] ResolverError),
}
