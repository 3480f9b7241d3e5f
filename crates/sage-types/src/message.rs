//! The verifier's input envelope.
//!
//! A [`Message`] is what a caller hands to the Verification Service: an
//! agent-signed payload plus the bookkeeping ([`signed_fields`](Message::signed_fields),
//! [`algorithm`](Message::algorithm)) it needs to reconstruct the signature
//! base and dispatch to the right algorithm.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::agent::CapabilityValue;
use crate::did::Did;
use crate::error::{MessageError, KNOWN_ALGORITHMS, STANDARD_SIGNED_FIELDS};

/// An agent-signed message, as received by the Verification Service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Message {
    agent_did: Did,
    message_id: String,
    timestamp: DateTime<Utc>,
    nonce: String,
    body: Vec<u8>,
    headers: BTreeMap<String, String>,
    /// Caller-supplied metadata, checked against the agent's on-chain fields
    /// by the Verification Service and (for `capabilities`) enriched by it
    /// in a copy, never by mutating the caller's value.
    metadata: BTreeMap<String, CapabilityValue>,
    /// Identifies which of the agent's registered keys signed this message.
    key_id: String,
    /// The ordered list of field names the signature covers. Each entry is
    /// either a [`STANDARD_SIGNED_FIELDS`] slot or a `header.<Name>`
    /// reference into `headers`.
    signed_fields: Vec<String>,
    /// The algorithm tag dispatched on by `sage-crypto`; must appear in
    /// [`KNOWN_ALGORITHMS`].
    algorithm: String,
    signature: Vec<u8>,
}

impl Message {
    /// Constructs a message, validating its field invariants:
    /// - `signed_fields` is non-empty
    /// - every entry is a standard slot or a `header.<Name>` reference to a
    ///   header actually present in `headers`
    /// - `algorithm` is a recognized tag
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        agent_did: Did,
        message_id: String,
        timestamp: DateTime<Utc>,
        nonce: String,
        body: Vec<u8>,
        headers: BTreeMap<String, String>,
        metadata: BTreeMap<String, CapabilityValue>,
        key_id: String,
        signed_fields: Vec<String>,
        algorithm: String,
        signature: Vec<u8>,
    ) -> Result<Self, MessageError> {
        if signed_fields.is_empty() {
            return Err(MessageError::EmptySignedFields);
        }
        for field in &signed_fields {
            let known_standard = STANDARD_SIGNED_FIELDS.contains(&field.as_str());
            let known_header = field
                .strip_prefix("header.")
                .is_some_and(|name| headers.contains_key(name));
            if !known_standard && !known_header {
                return Err(MessageError::UnknownSignedField(field.clone()));
            }
        }
        if !KNOWN_ALGORITHMS.contains(&algorithm.as_str()) {
            return Err(MessageError::UnrecognizedAlgorithm(algorithm));
        }
        Ok(Message {
            agent_did,
            message_id,
            timestamp,
            nonce,
            body,
            headers,
            metadata,
            key_id,
            signed_fields,
            algorithm,
            signature,
        })
    }

    /// The claimed sender.
    pub fn agent_did(&self) -> &Did {
        &self.agent_did
    }

    /// A caller-assigned message identifier, used for duplicate-payload detection.
    pub fn message_id(&self) -> &str {
        &self.message_id
    }

    /// The claimed signing time.
    pub fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }

    /// Identifies which of the agent's registered keys signed this message.
    pub fn key_id(&self) -> &str {
        &self.key_id
    }

    /// The caller-supplied metadata map.
    pub fn metadata(&self) -> &BTreeMap<String, CapabilityValue> {
        &self.metadata
    }

    /// A detached copy of [`metadata`](Message::metadata), for callers that
    /// need to enrich the map (e.g. injecting on-chain capabilities) without
    /// observably mutating this message (spec.md §9 Open Question 4).
    pub fn metadata_for_verification(&self) -> BTreeMap<String, CapabilityValue> {
        self.metadata.clone()
    }

    /// A per-sender, monotonically tracked replay-prevention token.
    pub fn nonce(&self) -> &str {
        &self.nonce
    }

    /// The raw message body, as covered by the `body` signed field.
    pub fn body(&self) -> &[u8] {
        &self.body
    }

    /// Header map, keyed by header name (case as supplied by the caller).
    pub fn headers(&self) -> &BTreeMap<String, String> {
        &self.headers
    }

    /// The ordered fields the signature covers.
    pub fn signed_fields(&self) -> &[String] {
        &self.signed_fields
    }

    /// The signature algorithm tag.
    pub fn algorithm(&self) -> &str {
        &self.algorithm
    }

    /// The raw signature bytes.
    pub fn signature(&self) -> &[u8] {
        &self.signature
    }
}
