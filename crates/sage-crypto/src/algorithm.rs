//! Algorithm tag dispatch (spec.md §4.2).

use sage_types::KeyType;

use crate::error::CryptoError;
use crate::key::{PublicKey, key_type_label};

/// A recognized signature algorithm, parsed from the wire tag carried on a
/// [`Message`](sage_types::Message) or `Signature-Input` header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Algorithm {
    /// `EdDSA` / `ed25519`: Ed25519 verify over the raw base bytes, no pre-hash.
    Ed25519,
    /// `ECDSA` / `ES256K` / `ECDSA-secp256k1`: secp256k1 ECDSA over SHA-256(base).
    EcdsaSecp256k1,
    /// `ecdsa-p256`: NIST P-256 ECDSA over SHA-256(base).
    EcdsaP256,
    /// `rsa-pss-sha256`: RSA-PSS over SHA-256(base).
    RsaPssSha256,
    /// `rsa-v1_5-sha256`: RSA PKCS#1 v1.5 over SHA-256(base).
    RsaPkcs1v15Sha256,
}

impl Algorithm {
    /// Parses a wire algorithm tag.
    pub fn parse(tag: &str) -> Result<Self, CryptoError> {
        match tag {
            "EdDSA" | "ed25519" => Ok(Algorithm::Ed25519),
            "ECDSA" | "ES256K" | "ECDSA-secp256k1" => Ok(Algorithm::EcdsaSecp256k1),
            "ecdsa-p256" => Ok(Algorithm::EcdsaP256),
            "rsa-pss-sha256" => Ok(Algorithm::RsaPssSha256),
            "rsa-v1_5-sha256" => Ok(Algorithm::RsaPkcs1v15Sha256),
            other => Err(CryptoError::UnsupportedAlgorithm(other.to_string())),
        }
    }

    /// The key type this algorithm requires.
    pub fn expected_key_type(self) -> KeyType {
        match self {
            Algorithm::Ed25519 => KeyType::Ed25519,
            Algorithm::EcdsaSecp256k1 => KeyType::Secp256k1,
            Algorithm::EcdsaP256 => KeyType::P256,
            Algorithm::RsaPssSha256 | Algorithm::RsaPkcs1v15Sha256 => KeyType::Rsa,
        }
    }
}

/// Verifies `signature` over `base` using `algorithm_tag`, dispatching by
/// key type and enforcing algorithm/key compatibility first.
pub fn verify_signature(
    algorithm_tag: &str,
    public_key: &PublicKey,
    base: &[u8],
    signature: &[u8],
) -> Result<bool, CryptoError> {
    let algorithm = Algorithm::parse(algorithm_tag)?;
    let expected = algorithm.expected_key_type();
    if expected != public_key.key_type() {
        return Err(CryptoError::AlgorithmKeyMismatch {
            algorithm: algorithm_tag.to_string(),
            key_type: key_type_label(public_key.key_type()),
        });
    }
    match algorithm {
        Algorithm::RsaPssSha256 => public_key.verify_rsa_pss(base, signature),
        _ => public_key.verify(base, signature),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_all_known_tags() {
        for tag in [
            "EdDSA",
            "ed25519",
            "ECDSA",
            "ES256K",
            "ECDSA-secp256k1",
            "ecdsa-p256",
            "rsa-pss-sha256",
            "rsa-v1_5-sha256",
        ] {
            assert!(Algorithm::parse(tag).is_ok(), "{tag} should parse");
        }
    }

    #[test]
    fn rejects_unknown_tag() {
        assert!(Algorithm::parse("hs256").is_err());
    }
}
