//! Input-error taxonomy for the leaf data model.
//!
//! Per the trust kernel's error design, these are *raised*, never returned as
//! a verification verdict: a malformed DID or message is a caller mistake,
//! not a trust decision about an otherwise well-formed message.

use thiserror::Error;

/// A DID string failed to parse or does not satisfy the `did:sage:...` grammar.
#[derive(Debug, Error, PartialEq, Eq, Clone)]
pub enum DidError {
    /// The string has too few or too many colon-separated segments, or is
    /// missing the `did:sage:` prefix entirely.
    #[error("invalid DID format: {0}")]
    InvalidFormat(String),
    /// The chain segment is neither a known long nor short chain token.
    #[error("unknown chain identifier: {0}")]
    UnknownChain(String),
    /// The address segment is not valid for the resolved chain (bad hex,
    /// wrong length, invalid Base58 alphabet, etc).
    #[error("invalid {chain} address: {address}")]
    InvalidAddress {
        /// The chain the address was validated against.
        chain: &'static str,
        /// The offending address string.
        address: String,
    },
    /// The trailing nonce segment is present but not a decimal integer.
    #[error("invalid DID nonce: {0}")]
    InvalidNonce(String),
}

/// An [`AgentKey`](crate::key::AgentKey) was constructed with bytes that
/// violate its key type's size invariant.
#[derive(Debug, Error, PartialEq, Eq, Clone)]
pub enum KeyError {
    /// The public key byte length does not match any accepted size for this key type.
    #[error("{key_type} public key must be {expected}, got {actual} bytes")]
    InvalidPublicKeyLength {
        /// The key type that rejected the input.
        key_type: &'static str,
        /// A human-readable description of accepted sizes.
        expected: &'static str,
        /// The length actually supplied.
        actual: usize,
    },
    /// Proof-of-possession was requested for an X25519 key, which is never a
    /// signing key and is exempt from PoP by construction.
    #[error("X25519 keys do not support proof-of-possession")]
    PopNotApplicableToX25519,
}

/// An [`AgentMetadata`](crate::agent::AgentMetadata) snapshot violates one of
/// its structural invariants.
#[derive(Debug, Error, PartialEq, Eq, Clone)]
pub enum MetadataError {
    /// `updated_at` predates `created_at`.
    #[error("updated_at ({updated}) precedes created_at ({created})")]
    TimestampsNotMonotonic {
        /// `created_at` as an RFC-3339 string, for display.
        created: String,
        /// `updated_at` as an RFC-3339 string, for display.
        updated: String,
    },
    /// An active agent was constructed with no key in `Verified` state.
    #[error("an active agent must have at least one verified signing key")]
    NoVerifiedSigningKey,
    /// The owner field is not a syntactically valid address for the agent's chain.
    #[error("invalid owner address: {0}")]
    InvalidOwner(String),
}

/// A [`Message`](crate::message::Message) violates one of its field invariants.
#[derive(Debug, Error, PartialEq, Eq, Clone)]
pub enum MessageError {
    /// `signed_fields` was empty; there is nothing to build a signature base over.
    #[error("signed_fields must not be empty")]
    EmptySignedFields,
    /// A name in `signed_fields` is neither a recognized standard slot nor a
    /// `header.<Name>` reference to a present header.
    #[error("signed field `{0}` is not a known slot and has no matching header")]
    UnknownSignedField(String),
    /// `algorithm` is not one of the tags the verifier dispatches on.
    #[error("unrecognized signature algorithm tag: {0}")]
    UnrecognizedAlgorithm(String),
}

/// The standard (non-`header.`-prefixed) field names a [`Message`](crate::message::Message)
/// may list in `signed_fields`.
pub const STANDARD_SIGNED_FIELDS: &[&str] =
    &["agent_did", "message_id", "timestamp", "nonce", "body"];

/// Algorithm tags the trust kernel recognizes, shared between
/// [`Message`](crate::message::Message) validation and `sage-crypto`'s dispatch
/// table so the two can never drift apart.
pub const KNOWN_ALGORITHMS: &[&str] = &[
    "EdDSA",
    "ed25519",
    "ECDSA",
    "ES256K",
    "ECDSA-secp256k1",
    "ecdsa-p256",
    "rsa-pss-sha256",
    "rsa-v1_5-sha256",
];
