//! Polymorphic key handling (spec.md §9): `PublicKey`/`PrivateKey` variants
//! over the five key families the trust kernel deals with, dispatched by
//! pattern match rather than accepted as `any`/generic pointers at module
//! boundaries.

use ed25519_dalek::{Signature as Ed25519Signature, Signer as _, SigningKey, Verifier as _, VerifyingKey};
use k256::ecdsa::{
    Signature as Secp256k1Signature, SigningKey as Secp256k1SigningKey,
    VerifyingKey as Secp256k1VerifyingKey, signature::Signer as _, signature::Verifier as _,
};
use k256::elliptic_curve::sec1::ToEncodedPoint;
use p256::ecdsa::{
    Signature as P256Signature, SigningKey as P256SigningKey, VerifyingKey as P256VerifyingKey,
};
use p256::elliptic_curve::sec1::ToEncodedPoint as _;
use rsa::pkcs1v15::{Signature as RsaPkcs1Signature, SigningKey as RsaSigningKey, VerifyingKey as RsaVerifyingKey};
use rsa::pkcs8::{DecodePrivateKey, DecodePublicKey};
use rsa::signature::{Signer as RsaSigner, Verifier as RsaVerifierTrait};
use sha2::Sha256;

use sage_types::KeyType;

use crate::error::CryptoError;

/// A verification key, decoded from an [`AgentKey`](sage_types::AgentKey)'s raw bytes.
pub enum PublicKey {
    Ed25519(VerifyingKey),
    Secp256k1(Secp256k1VerifyingKey),
    P256(P256VerifyingKey),
    Rsa(rsa::RsaPublicKey),
    X25519([u8; 32]),
}

/// A signing key, held only transiently while producing a proof-of-possession
/// or A2A Agent Card signature (spec.md §5 "Keys and secrets").
pub enum PrivateKey {
    Ed25519(SigningKey),
    Secp256k1(Secp256k1SigningKey),
    P256(P256SigningKey),
    Rsa(rsa::RsaPrivateKey),
    X25519([u8; 32]),
}

impl PublicKey {
    /// Decodes raw public key bytes according to `key_type`.
    ///
    /// Ed25519/X25519 take 32 raw bytes; secp256k1/P-256 take SEC1
    /// compressed (33), uncompressed (65), or — secp256k1 only — raw `X‖Y`
    /// (64) bytes; RSA takes a DER-encoded `SubjectPublicKeyInfo`.
    pub fn decode(key_type: KeyType, bytes: &[u8]) -> Result<Self, CryptoError> {
        let invalid = |reason: String| CryptoError::InvalidPublicKey {
            key_type: key_type_label(key_type),
            reason,
        };
        match key_type {
            KeyType::Ed25519 => {
                let array: [u8; 32] = bytes.try_into().map_err(|_| invalid("expected 32 bytes".into()))?;
                VerifyingKey::from_bytes(&array)
                    .map(PublicKey::Ed25519)
                    .map_err(|e| invalid(e.to_string()))
            }
            KeyType::X25519 => {
                let array: [u8; 32] = bytes.try_into().map_err(|_| invalid("expected 32 bytes".into()))?;
                Ok(PublicKey::X25519(array))
            }
            KeyType::Secp256k1 => {
                let sec1 = to_sec1(bytes);
                Secp256k1VerifyingKey::from_sec1_bytes(&sec1)
                    .map(PublicKey::Secp256k1)
                    .map_err(|e| invalid(e.to_string()))
            }
            KeyType::P256 => P256VerifyingKey::from_sec1_bytes(bytes)
                .map(PublicKey::P256)
                .map_err(|e| invalid(e.to_string())),
            KeyType::Rsa => rsa::RsaPublicKey::from_public_key_der(bytes)
                .map(PublicKey::Rsa)
                .map_err(|e| invalid(e.to_string())),
        }
    }

    /// Verifies `signature` over `message` using the algorithm implied by
    /// this key's variant. Ed25519 hashes nothing extra; the ECDSA and RSA
    /// variants hash `message` with SHA-256 internally.
    pub fn verify(&self, message: &[u8], signature: &[u8]) -> Result<bool, CryptoError> {
        match self {
            PublicKey::Ed25519(vk) => {
                let array: [u8; 64] = signature
                    .try_into()
                    .map_err(|_| malformed("EdDSA", "expected 64 bytes"))?;
                let sig = Ed25519Signature::from_bytes(&array);
                Ok(vk.verify(message, &sig).is_ok())
            }
            PublicKey::Secp256k1(vk) => {
                let sig_bytes = strip_recovery_byte(signature);
                let sig = Secp256k1Signature::from_slice(sig_bytes)
                    .map_err(|e| malformed("ECDSA-secp256k1", &e.to_string()))?;
                Ok(vk.verify(message, &sig).is_ok())
            }
            PublicKey::P256(vk) => {
                let sig = P256Signature::from_slice(signature)
                    .map_err(|e| malformed("ecdsa-p256", &e.to_string()))?;
                use p256::ecdsa::signature::Verifier as _;
                Ok(vk.verify(message, &sig).is_ok())
            }
            PublicKey::Rsa(pk) => Ok(verify_rsa_pkcs1v15(pk, message, signature)),
            PublicKey::X25519(_) => Err(CryptoError::AlgorithmKeyMismatch {
                algorithm: "any".to_string(),
                key_type: "X25519",
            }),
        }
    }

    /// Verifies an `rsa-pss-sha256` signature. Only meaningful for the
    /// [`PublicKey::Rsa`] variant; any other variant is an algorithm/key
    /// mismatch, matching [`PublicKey::verify`]'s behavior for X25519.
    pub fn verify_rsa_pss(&self, message: &[u8], signature: &[u8]) -> Result<bool, CryptoError> {
        match self {
            PublicKey::Rsa(pk) => {
                let verifying_key = rsa::pss::VerifyingKey::<Sha256>::new(pk.clone());
                let Ok(sig) = rsa::pss::Signature::try_from(signature) else {
                    return Ok(false);
                };
                use rsa::signature::Verifier as _;
                Ok(verifying_key.verify(message, &sig).is_ok())
            }
            other => Err(CryptoError::AlgorithmKeyMismatch {
                algorithm: "rsa-pss-sha256".to_string(),
                key_type: key_type_label(other.key_type()),
            }),
        }
    }

    /// The key's type tag.
    pub fn key_type(&self) -> KeyType {
        match self {
            PublicKey::Ed25519(_) => KeyType::Ed25519,
            PublicKey::Secp256k1(_) => KeyType::Secp256k1,
            PublicKey::P256(_) => KeyType::P256,
            PublicKey::Rsa(_) => KeyType::Rsa,
            PublicKey::X25519(_) => KeyType::X25519,
        }
    }

    /// The 64-byte `X‖Y` affine coordinates of a secp256k1 key, required by
    /// [`crate::keccak::derive_eth_address`].
    pub fn secp256k1_xy(&self) -> Result<[u8; 64], CryptoError> {
        match self {
            PublicKey::Secp256k1(vk) => {
                let uncompressed = vk.to_encoded_point(false);
                let bytes = uncompressed.as_bytes();
                // SEC1 uncompressed form is 0x04 || X || Y.
                bytes[1..].try_into().map_err(|_| CryptoError::InvalidPublicKey {
                    key_type: "secp256k1",
                    reason: "unexpected point encoding length".to_string(),
                })
            }
            other => Err(CryptoError::NotASecp256k1Key {
                key_type: key_type_label(other.key_type()),
            }),
        }
    }
}

impl PrivateKey {
    /// Decodes raw private key bytes according to `key_type`. Ed25519/X25519
    /// and secp256k1/P-256 take a 32-byte scalar; RSA takes a DER-encoded
    /// `PrivateKeyInfo` (PKCS#8).
    pub fn decode(key_type: KeyType, bytes: &[u8]) -> Result<Self, CryptoError> {
        let invalid = |reason: String| CryptoError::InvalidPrivateKey {
            key_type: key_type_label(key_type),
            reason,
        };
        match key_type {
            KeyType::Ed25519 => {
                let array: [u8; 32] = bytes.try_into().map_err(|_| invalid("expected 32 bytes".into()))?;
                Ok(PrivateKey::Ed25519(SigningKey::from_bytes(&array)))
            }
            KeyType::X25519 => {
                let array: [u8; 32] = bytes.try_into().map_err(|_| invalid("expected 32 bytes".into()))?;
                Ok(PrivateKey::X25519(array))
            }
            KeyType::Secp256k1 => Secp256k1SigningKey::from_slice(bytes)
                .map(PrivateKey::Secp256k1)
                .map_err(|e| invalid(e.to_string())),
            KeyType::P256 => P256SigningKey::from_slice(bytes)
                .map(PrivateKey::P256)
                .map_err(|e| invalid(e.to_string())),
            KeyType::Rsa => rsa::RsaPrivateKey::from_pkcs8_der(bytes)
                .map(PrivateKey::Rsa)
                .map_err(|e| invalid(e.to_string())),
        }
    }

    /// Signs `message`, dispatching to the variant's algorithm. RSA signing
    /// uses the deterministic PKCS#1 v1.5 scheme so no RNG is threaded
    /// through this call.
    pub fn sign(&self, message: &[u8]) -> Result<Vec<u8>, CryptoError> {
        match self {
            PrivateKey::Ed25519(sk) => Ok(sk.sign(message).to_bytes().to_vec()),
            PrivateKey::Secp256k1(sk) => {
                let sig: Secp256k1Signature = sk.sign(message);
                Ok(sig.to_vec())
            }
            PrivateKey::P256(sk) => {
                use p256::ecdsa::signature::Signer as _;
                let sig: P256Signature = sk.sign(message);
                Ok(sig.to_vec())
            }
            PrivateKey::Rsa(sk) => {
                let signing_key = RsaSigningKey::<Sha256>::new(sk.clone());
                let sig: RsaPkcs1Signature = signing_key.sign(message);
                Ok(sig.to_vec())
            }
            PrivateKey::X25519(_) => Err(CryptoError::PopNotApplicable { key_type: "X25519" }),
        }
    }

    /// The corresponding public key bytes, in the same encoding
    /// [`PublicKey::decode`] accepts, used to build the proof-of-possession
    /// challenge preimage.
    pub fn public_key_bytes(&self) -> Vec<u8> {
        match self {
            PrivateKey::Ed25519(sk) => sk.verifying_key().to_bytes().to_vec(),
            PrivateKey::Secp256k1(sk) => {
                Secp256k1VerifyingKey::from(sk).to_encoded_point(true).as_bytes().to_vec()
            }
            PrivateKey::P256(sk) => {
                P256VerifyingKey::from(sk).to_encoded_point(true).as_bytes().to_vec()
            }
            PrivateKey::Rsa(sk) => {
                use rsa::pkcs8::EncodePublicKey;
                sk.to_public_key()
                    .to_public_key_der()
                    .expect("RSA public key DER encoding never fails for a valid key")
                    .as_bytes()
                    .to_vec()
            }
            PrivateKey::X25519(bytes) => bytes.to_vec(),
        }
    }

    /// The key's type tag.
    pub fn key_type(&self) -> KeyType {
        match self {
            PrivateKey::Ed25519(_) => KeyType::Ed25519,
            PrivateKey::Secp256k1(_) => KeyType::Secp256k1,
            PrivateKey::P256(_) => KeyType::P256,
            PrivateKey::Rsa(_) => KeyType::Rsa,
            PrivateKey::X25519(_) => KeyType::X25519,
        }
    }
}

fn verify_rsa_pkcs1v15(pk: &rsa::RsaPublicKey, message: &[u8], signature: &[u8]) -> bool {
    let Ok(sig) = RsaPkcs1Signature::try_from(signature) else {
        return false;
    };
    let verifying_key = RsaVerifyingKey::<Sha256>::new(pk.clone());
    verifying_key.verify(message, &sig).is_ok()
}

/// Tries both accepted lengths: a raw `X‖Y` pair (64 bytes, secp256k1 only)
/// is promoted to SEC1 uncompressed form by prepending `0x04`.
fn to_sec1(bytes: &[u8]) -> Vec<u8> {
    if bytes.len() == 64 {
        let mut out = Vec::with_capacity(65);
        out.push(0x04);
        out.extend_from_slice(bytes);
        out
    } else {
        bytes.to_vec()
    }
}

/// Drops a trailing Ethereum-style recovery byte (65-byte `r‖s‖v` form) so
/// the remaining 64 bytes parse as a plain `r‖s` signature.
fn strip_recovery_byte(signature: &[u8]) -> &[u8] {
    if signature.len() == 65 {
        &signature[..64]
    } else {
        signature
    }
}

fn malformed(algorithm: &str, reason: &str) -> CryptoError {
    CryptoError::MalformedSignature {
        algorithm: algorithm.to_string(),
        reason: reason.to_string(),
    }
}

pub(crate) fn key_type_label(key_type: KeyType) -> &'static str {
    match key_type {
        KeyType::Ed25519 => "Ed25519",
        KeyType::Secp256k1 => "secp256k1",
        KeyType::P256 => "P-256",
        KeyType::Rsa => "RSA",
        KeyType::X25519 => "X25519",
    }
}
