//! Agent signing keys.
//!
//! An agent may register several [`AgentKey`]s, each tagged with a
//! [`KeyType`] naming the algorithm its public key material is for and a
//! [`PopStatus`] recording whether the key has completed proof-of-possession.
//! `sage-crypto` is the only crate that actually runs a PoP challenge; this
//! crate only carries the resulting state.

use serde::{Deserialize, Serialize};

use crate::error::KeyError;

/// The signature algorithm family an [`AgentKey`]'s public key material belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum KeyType {
    /// Ed25519, 32-byte public key.
    Ed25519,
    /// ECDSA over secp256k1 (SEC1 compressed, 33 bytes, or uncompressed, 65 bytes).
    Secp256k1,
    /// ECDSA over NIST P-256 (SEC1 compressed, 33 bytes, or uncompressed, 65 bytes).
    P256,
    /// RSA, DER-encoded `SubjectPublicKeyInfo`. Size varies with modulus length.
    Rsa,
    /// X25519, 32-byte Diffie-Hellman public key. Never a signing key: exempt
    /// from proof-of-possession by construction.
    X25519,
}

impl KeyType {
    fn validate_len(self, len: usize) -> Result<(), KeyError> {
        let ok = match self {
            KeyType::Ed25519 | KeyType::X25519 => len == 32,
            KeyType::Secp256k1 => len == 33 || len == 64 || len == 65,
            KeyType::P256 => len == 33 || len == 65,
            KeyType::Rsa => len >= 140,
        };
        if ok {
            Ok(())
        } else {
            Err(KeyError::InvalidPublicKeyLength {
                key_type: self.label(),
                expected: self.expected_len_description(),
                actual: len,
            })
        }
    }

    fn label(self) -> &'static str {
        match self {
            KeyType::Ed25519 => "Ed25519",
            KeyType::Secp256k1 => "secp256k1",
            KeyType::P256 => "P-256",
            KeyType::Rsa => "RSA",
            KeyType::X25519 => "X25519",
        }
    }

    fn expected_len_description(self) -> &'static str {
        match self {
            KeyType::Ed25519 | KeyType::X25519 => "32 bytes",
            KeyType::Secp256k1 => "33 (compressed), 64 (raw X||Y) or 65 (uncompressed) bytes",
            KeyType::P256 => "33 (compressed) or 65 (uncompressed) bytes",
            KeyType::Rsa => "a DER-encoded SubjectPublicKeyInfo of at least 140 bytes",
        }
    }

    /// `true` for every key type except [`KeyType::X25519`], which is a
    /// Diffie-Hellman key and never signs a proof-of-possession challenge.
    pub fn supports_proof_of_possession(self) -> bool {
        !matches!(self, KeyType::X25519)
    }
}

/// Whether an [`AgentKey`] has completed proof-of-possession.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum PopStatus {
    /// No proof-of-possession challenge has been completed for this key yet.
    Unverified,
    /// The key owner has signed a PoP challenge and the signature checked out.
    Verified,
    /// A PoP challenge was attempted and failed; the key must not be trusted
    /// as a signing key until re-verified.
    Failed,
}

/// One signing key registered to an agent, as published in its on-chain metadata.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AgentKey {
    key_type: KeyType,
    #[serde(with = "hex_bytes")]
    public_key: Vec<u8>,
    pop_status: PopStatus,
}

impl AgentKey {
    /// Constructs a key, validating `public_key`'s length against `key_type`.
    pub fn new(
        key_type: KeyType,
        public_key: Vec<u8>,
        pop_status: PopStatus,
    ) -> Result<Self, KeyError> {
        key_type.validate_len(public_key.len())?;
        if pop_status != PopStatus::Unverified && !key_type.supports_proof_of_possession() {
            return Err(KeyError::PopNotApplicableToX25519);
        }
        Ok(AgentKey {
            key_type,
            public_key,
            pop_status,
        })
    }

    /// The key's algorithm family.
    pub fn key_type(&self) -> KeyType {
        self.key_type
    }

    /// The raw public key bytes.
    pub fn public_key(&self) -> &[u8] {
        &self.public_key
    }

    /// The key's proof-of-possession status.
    pub fn pop_status(&self) -> PopStatus {
        self.pop_status
    }

    /// `true` if this key may be used to verify a signed message: it must
    /// support PoP and have completed it successfully.
    pub fn is_verified_signing_key(&self) -> bool {
        self.key_type.supports_proof_of_possession() && self.pop_status == PopStatus::Verified
    }
}

mod hex_bytes {
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(bytes: &[u8], serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&hex::encode(bytes))
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Vec<u8>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        hex::decode(s.trim_start_matches("0x")).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_valid_ed25519_key() {
        let key = AgentKey::new(KeyType::Ed25519, vec![0u8; 32], PopStatus::Unverified).unwrap();
        assert_eq!(key.key_type(), KeyType::Ed25519);
        assert!(!key.is_verified_signing_key());
    }

    #[test]
    fn rejects_wrong_length() {
        assert!(AgentKey::new(KeyType::Ed25519, vec![0u8; 31], PopStatus::Unverified).is_err());
    }

    #[test]
    fn accepts_compressed_and_uncompressed_secp256k1() {
        assert!(AgentKey::new(KeyType::Secp256k1, vec![2u8; 33], PopStatus::Unverified).is_ok());
        assert!(AgentKey::new(KeyType::Secp256k1, vec![4u8; 65], PopStatus::Unverified).is_ok());
    }

    #[test]
    fn x25519_rejects_non_unverified_pop_status() {
        assert!(AgentKey::new(KeyType::X25519, vec![0u8; 32], PopStatus::Verified).is_err());
        assert!(AgentKey::new(KeyType::X25519, vec![0u8; 32], PopStatus::Unverified).is_ok());
    }

    #[test]
    fn verified_signing_key_requires_verified_pop() {
        let key = AgentKey::new(KeyType::Ed25519, vec![1u8; 32], PopStatus::Verified).unwrap();
        assert!(key.is_verified_signing_key());

        let key = AgentKey::new(KeyType::Ed25519, vec![1u8; 32], PopStatus::Failed).unwrap();
        assert!(!key.is_verified_signing_key());
    }

    #[test]
    fn hex_roundtrip_through_serde() {
        let key = AgentKey::new(KeyType::Ed25519, vec![0xab; 32], PopStatus::Verified).unwrap();
        let json = serde_json::to_string(&key).unwrap();
        let back: AgentKey = serde_json::from_str(&json).unwrap();
        assert_eq!(key, back);
    }
}
