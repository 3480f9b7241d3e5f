//! W3C-DID-document-style Agent Card serialization and detached proof
//! (spec.md §4.5, §6).
//!
//! An [`AgentCard`] is built from an [`AgentMetadata`] snapshot. Signing
//! attaches a [`Proof`] computed over the card's canonical JSON form with
//! the `proof` field itself omitted; verification re-derives that same
//! digest and checks it against the referenced key inside the card.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use sage_types::{AgentMetadata, Did, KeyType};

use crate::error::CryptoError;
use crate::key::{PrivateKey, PublicKey, key_type_label};

const DID_CONTEXT: &str = "https://www.w3.org/ns/did/v1";
const SIGNATURE_SUITE_CONTEXT: &str = "https://w3id.org/security/suites/ed25519-2020/v1";

fn verification_key_type(key_type: KeyType) -> &'static str {
    match key_type {
        KeyType::Ed25519 => "Ed25519VerificationKey2020",
        KeyType::Secp256k1 => "EcdsaSecp256k1VerificationKey2019",
        KeyType::X25519 => "X25519KeyAgreementKey2019",
        KeyType::P256 => "EcdsaSecp256r1VerificationKey2019",
        KeyType::Rsa => "RsaVerificationKey2018",
    }
}

fn key_type_from_verification_key_type(label: &str) -> Option<KeyType> {
    match label {
        "Ed25519VerificationKey2020" => Some(KeyType::Ed25519),
        "EcdsaSecp256k1VerificationKey2019" => Some(KeyType::Secp256k1),
        "X25519KeyAgreementKey2019" => Some(KeyType::X25519),
        "EcdsaSecp256r1VerificationKey2019" => Some(KeyType::P256),
        "RsaVerificationKey2018" => Some(KeyType::Rsa),
        _ => None,
    }
}

/// One entry in an [`AgentCard`]'s `publicKey` array.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PublicKeyEntry {
    pub id: String,
    #[serde(rename = "type")]
    pub key_type: String,
    pub controller: String,
    pub public_key_base58: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub public_key_hex: Option<String>,
}

/// One entry in an [`AgentCard`]'s `service` array.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceEntry {
    #[serde(rename = "type")]
    pub service_type: String,
    pub uri: String,
}

impl ServiceEntry {
    /// The `MessageService` entry always emitted first, per spec.md §6.
    pub fn message_service(endpoint: impl Into<String>) -> Self {
        ServiceEntry {
            service_type: "MessageService".to_string(),
            uri: endpoint.into(),
        }
    }
}

/// A detached W3C-Verifiable-Credentials–style proof over an [`AgentCard`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Proof {
    #[serde(rename = "type")]
    pub proof_type: String,
    pub created: DateTime<Utc>,
    pub verification_method: String,
    pub proof_purpose: String,
    pub proof_value: String,
}

/// A W3C-DID-document-compatible Agent Card (spec.md §6).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AgentCard {
    #[serde(rename = "@context")]
    pub context: Vec<String>,
    pub id: String,
    #[serde(rename = "type")]
    pub card_type: Vec<String>,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub public_key: Vec<PublicKeyEntry>,
    pub service: Vec<ServiceEntry>,
    pub capabilities: Vec<String>,
    pub created: DateTime<Utc>,
    pub updated: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub proof: Option<Proof>,
}

impl AgentCard {
    /// Builds an unsigned card from an agent's on-chain metadata.
    ///
    /// Only [verified signing keys](sage_types::AgentKey::is_verified_signing_key)
    /// are emitted into `publicKey`; their position in `publicKey` carries
    /// the 1-based index from `metadata.keys()` used to build
    /// `verificationMethod` identifiers (`<DID>#key-<n>`). A `MessageService`
    /// entry built from `metadata.endpoint()` is always included first in
    /// `service`, per spec.md §6. Fails if no verified signing key survives
    /// the filter, since spec.md §6 requires every card to publish at least
    /// one (a deactivated agent, or one whose only verified key is X25519,
    /// has none).
    pub fn new(metadata: &AgentMetadata) -> Result<Self, CryptoError> {
        let did = metadata.did();
        let public_key: Vec<PublicKeyEntry> = metadata
            .keys()
            .iter()
            .enumerate()
            .filter(|(_, key)| key.is_verified_signing_key())
            .map(|(index, key)| {
                let n = index + 1;
                PublicKeyEntry {
                    id: format!("{did}#key-{n}"),
                    key_type: verification_key_type(key.key_type()).to_string(),
                    controller: did.to_string(),
                    public_key_base58: bs58::encode(key.public_key()).into_string(),
                    public_key_hex: Some(hex::encode(key.public_key())),
                }
            })
            .collect();

        if public_key.is_empty() {
            return Err(CryptoError::NoVerifiedSigningKey {
                did: did.to_string(),
            });
        }

        let mut service = Vec::with_capacity(1);
        service.push(ServiceEntry::message_service(
            metadata.endpoint().unwrap_or_default(),
        ));

        Ok(AgentCard {
            context: vec![DID_CONTEXT.to_string(), SIGNATURE_SUITE_CONTEXT.to_string()],
            id: did.to_string(),
            card_type: vec!["Agent".to_string(), "AIAgent".to_string()],
            name: metadata.name().to_string(),
            description: metadata.description().map(String::from),
            public_key,
            service,
            capabilities: metadata.capabilities().keys().cloned().collect(),
            created: metadata.created_at(),
            updated: metadata.updated_at(),
            proof: None,
        })
    }

    /// The SHA-256 digest of the card's canonical JSON form with the
    /// `proof` field omitted, per spec.md §4.5.
    fn signing_digest(&self) -> [u8; 32] {
        let mut unsigned = self.clone();
        unsigned.proof = None;
        let json =
            serde_json::to_vec(&unsigned).expect("AgentCard serialization is infallible");
        Sha256::digest(&json).into()
    }
}

/// Signs `card` with `private_key`, attaching a [`Proof`] referencing
/// `<did>#key-<key_index>` (1-based, matching [`AgentCard::new`]'s
/// indexing). Only Ed25519 and secp256k1 keys produce a recognized proof
/// `type`, per spec.md §4.5.
pub fn sign_card(
    card: &AgentCard,
    did: &Did,
    key_index: usize,
    private_key: &PrivateKey,
) -> Result<AgentCard, CryptoError> {
    let proof_type = match private_key.key_type() {
        KeyType::Ed25519 => "Ed25519Signature2020",
        KeyType::Secp256k1 => "EcdsaSecp256k1Signature2019",
        other => {
            return Err(CryptoError::AlgorithmKeyMismatch {
                algorithm: "a2a-card-proof".to_string(),
                key_type: key_type_label(other),
            });
        }
    };
    let digest = card.signing_digest();
    let signature = private_key.sign(&digest)?;
    let proof = Proof {
        proof_type: proof_type.to_string(),
        created: Utc::now(),
        verification_method: format!("{did}#key-{key_index}"),
        proof_purpose: "assertionMethod".to_string(),
        proof_value: bs58::encode(&signature).into_string(),
    };
    let mut signed = card.clone();
    signed.proof = Some(proof);
    Ok(signed)
}

/// Verifies a signed card's detached proof: re-derives the proof-stripped
/// digest, resolves the referenced key from the card's own `publicKey`
/// array, and checks the decoded signature against it.
pub fn verify_card_proof(card: &AgentCard) -> Result<bool, CryptoError> {
    let proof = card.proof.as_ref().ok_or_else(|| CryptoError::MalformedSignature {
        algorithm: "a2a-card-proof".to_string(),
        reason: "card has no proof".to_string(),
    })?;

    let Some(entry) = card
        .public_key
        .iter()
        .find(|entry| entry.id == proof.verification_method)
    else {
        return Ok(false);
    };

    let Some(key_type) = key_type_from_verification_key_type(&entry.key_type) else {
        return Ok(false);
    };
    let Ok(public_key_bytes) = bs58::decode(&entry.public_key_base58).into_vec() else {
        return Ok(false);
    };
    let public_key = PublicKey::decode(key_type, &public_key_bytes)?;

    let Ok(signature) = bs58::decode(&proof.proof_value).into_vec() else {
        return Ok(false);
    };

    let digest = card.signing_digest();
    public_key.verify(&digest, &signature)
}

#[cfg(test)]
mod tests {
    use super::*;
    use sage_types::{AgentKey, Chain, PopStatus};
    use std::str::FromStr;

    fn sample_card_and_key() -> (AgentCard, Did, PrivateKey) {
        let signing = ed25519_dalek::SigningKey::generate(&mut rand_core::OsRng);
        let did = Did::new(
            Chain::Ethereum,
            "0xabcd000000000000000000000000000000001234",
            None,
        )
        .unwrap();
        let key = AgentKey::new(
            KeyType::Ed25519,
            signing.verifying_key().to_bytes().to_vec(),
            PopStatus::Verified,
        )
        .unwrap();
        let now = Utc::now();
        let metadata = AgentMetadata::new(
            did.clone(),
            "0x000000000000000000000000000000000000b0b0".into(),
            "agent-1".into(),
            Some("a test agent".into()),
            Some("https://agent.example/api".into()),
            vec![key],
            Default::default(),
            true,
            now,
            now,
        )
        .unwrap();
        let card = AgentCard::new(&metadata).unwrap();
        (card, did, PrivateKey::Ed25519(signing))
    }

    #[test]
    fn card_has_message_service_first_and_one_public_key() {
        let (card, _, _) = sample_card_and_key();
        assert_eq!(card.service[0].service_type, "MessageService");
        assert_eq!(card.service[0].uri, "https://agent.example/api");
        assert_eq!(card.public_key.len(), 1);
        assert_eq!(card.public_key[0].id, format!("{}#key-1", card.id));
    }

    #[test]
    fn s8_a2a_round_trip_untouched_card_verifies() {
        let (card, did, private_key) = sample_card_and_key();
        let signed = sign_card(&card, &did, 1, &private_key).unwrap();
        assert!(verify_card_proof(&signed).unwrap());
    }

    #[test]
    fn s8_a2a_round_trip_tampered_name_fails() {
        let (card, did, private_key) = sample_card_and_key();
        let mut signed = sign_card(&card, &did, 1, &private_key).unwrap();
        signed.name.push('!');
        assert!(!verify_card_proof(&signed).unwrap());
    }

    #[test]
    fn unsigned_card_has_no_proof_field_in_json() {
        let (card, _, _) = sample_card_and_key();
        let json = serde_json::to_string(&card).unwrap();
        assert!(!json.contains("\"proof\""));
    }

    #[test]
    fn x25519_signing_key_is_rejected_for_card_proof() {
        let (card, did, _) = sample_card_and_key();
        let x25519 = PrivateKey::X25519([3u8; 32]);
        let err = sign_card(&card, &did, 1, &x25519).unwrap_err();
        assert!(matches!(err, CryptoError::AlgorithmKeyMismatch { .. }));
    }

    #[test]
    fn deactivated_agent_with_no_verified_key_is_rejected() {
        let did = Did::new(
            Chain::Ethereum,
            "0xabcd000000000000000000000000000000001234",
            None,
        )
        .unwrap();
        let now = Utc::now();
        let metadata = AgentMetadata::new(
            did,
            "0x000000000000000000000000000000000000b0b0".into(),
            "agent-1".into(),
            None,
            Some("https://agent.example/api".into()),
            Vec::new(),
            Default::default(),
            false,
            now,
            now,
        )
        .unwrap();
        let err = AgentCard::new(&metadata).unwrap_err();
        assert!(matches!(err, CryptoError::NoVerifiedSigningKey { .. }));
    }

    #[test]
    fn active_agent_whose_only_key_is_x25519_is_rejected() {
        // `AgentMetadata::new` would refuse this combination, but the type
        // also round-trips through serde (a resolver backend hands back
        // metadata deserialized straight off the chain, not built through the
        // constructor), so the card builder must not trust `active` alone.
        let json = serde_json::json!({
            "did": "did:sage:ethereum:0xabcd000000000000000000000000000000001234",
            "owner": "0x000000000000000000000000000000000000b0b0",
            "name": "agent-1",
            "description": null,
            "endpoint": "https://agent.example/api",
            "keys": [{
                "keyType": "x25519",
                "publicKey": hex::encode([2u8; 32]),
                "popStatus": "unverified",
            }],
            "capabilities": {},
            "active": true,
            "createdAt": Utc::now().to_rfc3339(),
            "updatedAt": Utc::now().to_rfc3339(),
        });
        let metadata: AgentMetadata = serde_json::from_value(json).unwrap();
        let err = AgentCard::new(&metadata).unwrap_err();
        assert!(matches!(err, CryptoError::NoVerifiedSigningKey { .. }));
    }
}
