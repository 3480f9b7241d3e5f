//! The Verification Service: the orchestration layer of the SAGE trust
//! kernel (spec.md §4.4).
//!
//! This crate composes [`sage_resolver::Resolver`], [`sage_crypto`]'s
//! algorithm dispatch, and [`sage_canon`]'s signature-base construction into
//! the single question the rest of the system asks: *is this message
//! authentically from the agent it claims to be from?* Two entry points
//! answer it:
//!
//! - [`VerificationService::verify`] — the full pipeline: resolve metadata,
//!   enforce activity/capabilities/metadata, verify the signature.
//! - [`quick_verify`] — the minimal path spec.md §4.4 describes: infer the
//!   algorithm from the DID's chain, resolve only the public key, verify a
//!   single-field (`body`) signature. No metadata, no activity check.
//!
//! # Modules
//!
//! - [`verifier`] — [`verifier::Verifier`], the stateless signature/policy dispatcher.
//! - [`service`] — [`service::VerificationService`], the resolve-then-verify orchestrator.
//! - [`quick`] — [`quick_verify`], the minimal signature-only path.
//! - [`options`] / [`outcome`] / [`result`] — the request/response types.
//! - [`error`] — errors this crate raises rather than folds into a verdict.

pub mod error;
pub mod options;
pub mod outcome;
pub mod quick;
pub mod result;
pub mod service;
pub mod verifier;

pub use error::VerifyError;
pub use options::VerificationOptions;
pub use outcome::VerifierVerdict;
pub use quick::quick_verify;
pub use result::VerificationResult;
pub use service::VerificationService;
pub use verifier::{Verifier, verify_http_signature};
