//! Input-error taxonomy for signature primitives (spec.md §7).
//!
//! These are raised by the low-level [`crate::algorithm::verify_signature`]
//! and key-construction entry points. [`crate::verifier::Verifier`] catches
//! them and folds them into a verdict instead of propagating them, per
//! spec.md §4.2's "verification never throws on bad input" rule — see
//! DESIGN.md for how the two layers reconcile §4.2 and §7.

use thiserror::Error;

/// A signature primitive could not be evaluated.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CryptoError {
    /// The algorithm tag is not one `sage-crypto` dispatches on.
    #[error("unsupported signature algorithm: {0}")]
    UnsupportedAlgorithm(String),
    /// The algorithm tag names a primitive incompatible with the supplied key's type.
    #[error("algorithm {algorithm} cannot be verified with a {key_type} key")]
    AlgorithmKeyMismatch {
        algorithm: String,
        key_type: &'static str,
    },
    /// The public key bytes do not decode into a valid point/modulus for their declared type.
    #[error("invalid public key encoding for {key_type}: {reason}")]
    InvalidPublicKey {
        key_type: &'static str,
        reason: String,
    },
    /// The private key bytes do not decode into a valid key for their declared type.
    #[error("invalid private key encoding for {key_type}: {reason}")]
    InvalidPrivateKey {
        key_type: &'static str,
        reason: String,
    },
    /// The signature bytes are the wrong length or otherwise not well-formed
    /// for the dispatched algorithm.
    #[error("malformed signature for {algorithm}: {reason}")]
    MalformedSignature { algorithm: String, reason: String },
    /// Proof-of-possession was requested for a key type that never signs (X25519).
    #[error("{key_type} keys do not support proof-of-possession")]
    PopNotApplicable { key_type: &'static str },
    /// Ethereum address derivation was requested for a non-secp256k1 key.
    #[error("Ethereum address derivation requires a secp256k1 key, got {key_type}")]
    NotASecp256k1Key { key_type: &'static str },
    /// An Agent Card would be built with an empty `publicKey` array.
    #[error("agent {did} has no verified signing key to publish in an agent card")]
    NoVerifiedSigningKey { did: String },
}
