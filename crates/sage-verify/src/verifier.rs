//! Signature and policy dispatch (spec.md §4.2).

use std::collections::BTreeMap;
use std::time::Duration as StdDuration;

use chrono::{DateTime, Duration as ChronoDuration, Utc};

use sage_canon::{SignatureBaseRequest, SignatureInputParams, build_signature_base};
use sage_crypto::{PublicKey, build_partial_base, verify_signature};
use sage_types::{CapabilityValue, Message};

use crate::error::VerifyError;
use crate::options::VerificationOptions;
use crate::outcome::VerifierVerdict;

/// Stateless dispatcher: verifies a signed [`Message`] against a resolved
/// public key and enforces the configured policy checks, in spec order.
///
/// Unlike [`verify_http_signature`], this never raises on malformed input —
/// a bad signature, an undecodable key, a stale timestamp, or a metadata
/// mismatch are all encoded in the returned [`VerifierVerdict`] (spec.md
/// §4.2 "Failure semantics").
pub struct Verifier;

impl Verifier {
    /// Runs the signature, timestamp, metadata, and capability checks in
    /// order, short-circuiting on the first failure.
    ///
    /// `message_metadata` is the caller's metadata map, already augmented
    /// with the agent's on-chain capabilities by the caller
    /// ([`crate::service::VerificationService`] does this in a copy, never
    /// by mutating the message) — this function only reads it.
    pub fn verify(
        message: &Message,
        public_key: &PublicKey,
        message_metadata: &BTreeMap<String, CapabilityValue>,
        options: &VerificationOptions,
        expected_metadata: &BTreeMap<String, CapabilityValue>,
    ) -> VerifierVerdict {
        let base = build_partial_base(message);
        let signature_ok = match verify_signature(
            message.algorithm(),
            public_key,
            base.as_bytes(),
            message.signature(),
        ) {
            Ok(ok) => ok,
            Err(err) => return VerifierVerdict::invalid(err.to_string()),
        };
        if !signature_ok {
            return VerifierVerdict::invalid("invalid signature");
        }

        if let Some(max_skew) = options.max_clock_skew {
            if !max_skew.is_zero() && !timestamp_within_skew(message.timestamp(), max_skew) {
                return VerifierVerdict::invalid("timestamp outside window");
            }
        }

        if options.verify_metadata && !metadata_matches(message_metadata, expected_metadata) {
            return VerifierVerdict::invalid("metadata mismatch");
        }

        if !capabilities_satisfied(message_metadata, &options.required_capabilities) {
            return VerifierVerdict::invalid("missing capabilities");
        }

        VerifierVerdict::Valid
    }
}

fn timestamp_within_skew(message_timestamp: DateTime<Utc>, max_skew: StdDuration) -> bool {
    let skew = ChronoDuration::from_std(max_skew).unwrap_or(ChronoDuration::MAX);
    (Utc::now() - message_timestamp).abs() <= skew
}

fn metadata_matches(
    message_metadata: &BTreeMap<String, CapabilityValue>,
    expected: &BTreeMap<String, CapabilityValue>,
) -> bool {
    expected.iter().all(|(k, v)| message_metadata.get(k) == Some(v))
}

fn capabilities_satisfied(message_metadata: &BTreeMap<String, CapabilityValue>, required: &[String]) -> bool {
    if required.is_empty() {
        return true;
    }
    let Some(CapabilityValue::Map(caps)) = message_metadata.get("capabilities") else {
        return false;
    };
    required.iter().all(|cap| match caps.get(cap) {
        Some(CapabilityValue::Bool(satisfied)) => *satisfied,
        Some(_) => true,
        None => false,
    })
}

/// Verifies a signature directly over an RFC-9421 HTTP signature base,
/// bypassing the [`Message`] envelope entirely. Unlike [`Verifier::verify`],
/// this raises: a missing covered component or malformed key is the
/// caller's mistake in how it described the request, not a trust decision
/// about an otherwise well-formed message (spec.md §7).
pub fn verify_http_signature(
    request: &SignatureBaseRequest,
    input: &SignatureInputParams,
    algorithm_tag: &str,
    public_key: &PublicKey,
    signature: &[u8],
) -> Result<bool, VerifyError> {
    let base = build_signature_base(request, input)?;
    Ok(verify_signature(algorithm_tag, public_key, base.as_bytes(), signature)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use ed25519_dalek::SigningKey;
    use rand_core::OsRng;
    use sage_crypto::PrivateKey;
    use sage_types::{Did, KeyType};
    use std::str::FromStr;

    fn sample_message(signature: Vec<u8>) -> Message {
        Message::new(
            Did::from_str("did:sage:ethereum:0xabcd000000000000000000000000000000001234").unwrap(),
            "msg-1".into(),
            Utc::now(),
            "nonce-1".into(),
            b"hello".to_vec(),
            BTreeMap::new(),
            BTreeMap::new(),
            "key-1".into(),
            vec!["agent_did".into(), "nonce".into(), "body".into()],
            "EdDSA".into(),
            signature,
        )
        .unwrap()
    }

    fn ed25519_pair() -> (PrivateKey, PublicKey) {
        let signing = SigningKey::generate(&mut OsRng);
        let private = PrivateKey::decode(KeyType::Ed25519, &signing.to_bytes()).unwrap();
        let public = PublicKey::decode(KeyType::Ed25519, signing.verifying_key().as_bytes()).unwrap();
        (private, public)
    }

    #[test]
    fn valid_signature_and_no_policy_checks_passes() {
        let (private, public) = ed25519_pair();
        let unsigned = sample_message(vec![]);
        let base = build_partial_base(&unsigned);
        let signature = private.sign(base.as_bytes()).unwrap();
        let message = sample_message(signature);

        let options = VerificationOptions {
            require_active_agent: false,
            max_clock_skew: None,
            verify_metadata: false,
            required_capabilities: Vec::new(),
            signature_name: None,
        };
        let verdict = Verifier::verify(&message, &public, &BTreeMap::new(), &options, &BTreeMap::new());
        assert_eq!(verdict, VerifierVerdict::Valid);
    }

    #[test]
    fn tampered_body_fails_signature_check() {
        let (private, public) = ed25519_pair();
        let unsigned = sample_message(vec![]);
        let base = build_partial_base(&unsigned);
        let signature = private.sign(base.as_bytes()).unwrap();

        let mut tampered = sample_message(signature);
        tampered = Message::new(
            tampered.agent_did().clone(),
            tampered.message_id().to_string(),
            tampered.timestamp(),
            tampered.nonce().to_string(),
            b"goodbye".to_vec(),
            tampered.headers().clone(),
            tampered.metadata().clone(),
            tampered.key_id().to_string(),
            tampered.signed_fields().to_vec(),
            tampered.algorithm().to_string(),
            tampered.signature().to_vec(),
        )
        .unwrap();

        let options = VerificationOptions::default();
        let verdict = Verifier::verify(&tampered, &public, &BTreeMap::new(), &options, &BTreeMap::new());
        assert!(matches!(verdict, VerifierVerdict::Invalid(_)));
    }

    #[test]
    fn missing_required_capability_is_rejected() {
        let (private, public) = ed25519_pair();
        let unsigned = sample_message(vec![]);
        let base = build_partial_base(&unsigned);
        let signature = private.sign(base.as_bytes()).unwrap();
        let message = sample_message(signature);

        let mut message_metadata = BTreeMap::new();
        message_metadata.insert("capabilities".to_string(), CapabilityValue::Map(BTreeMap::new()));

        let options = VerificationOptions {
            require_active_agent: false,
            max_clock_skew: None,
            verify_metadata: false,
            required_capabilities: vec!["streaming".to_string()],
            signature_name: None,
        };
        let verdict = Verifier::verify(&message, &public, &message_metadata, &options, &BTreeMap::new());
        assert_eq!(verdict, VerifierVerdict::Invalid("missing capabilities".to_string()));
    }
}
