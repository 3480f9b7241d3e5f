//! Per-key proof-of-possession (spec.md §4.5).
//!
//! Binds a public key to a DID: the key owner signs a domain-separated
//! challenge derived from the DID and the key's own bytes, proving they
//! hold the matching private key. X25519 keys never sign; PoP does not
//! apply to them (see [`sage_types::KeyType::supports_proof_of_possession`]).

use sha2::{Digest, Sha256};

use sage_types::Did;

use crate::error::CryptoError;
use crate::key::{PrivateKey, PublicKey};

const POP_DOMAIN_PREFIX: &str = "SAGE-PoP:";

/// Builds the SHA-256 digest of the domain-separated PoP challenge:
/// `"SAGE-PoP:" + <DID> + ":" + <lowercase hex of public key bytes>`.
fn challenge_digest(did: &Did, public_key_bytes: &[u8]) -> [u8; 32] {
    let preimage = format!("{POP_DOMAIN_PREFIX}{did}:{}", hex::encode(public_key_bytes));
    Sha256::digest(preimage.as_bytes()).into()
}

/// Signs a proof-of-possession challenge for `did` with `private_key`.
///
/// Fails with [`CryptoError::PopNotApplicable`] for an X25519 key.
pub fn sign_pop(private_key: &PrivateKey, did: &Did) -> Result<Vec<u8>, CryptoError> {
    let public_key_bytes = private_key.public_key_bytes();
    let digest = challenge_digest(did, &public_key_bytes);
    private_key.sign(&digest)
}

/// Re-derives the PoP challenge for `did` and `public_key` and verifies
/// `signature` over it.
pub fn verify_pop(
    public_key: &PublicKey,
    public_key_bytes: &[u8],
    did: &Did,
    signature: &[u8],
) -> Result<bool, CryptoError> {
    if public_key.key_type() == sage_types::KeyType::X25519 {
        return Err(CryptoError::PopNotApplicable { key_type: "X25519" });
    }
    let digest = challenge_digest(did, public_key_bytes);
    public_key.verify(&digest, signature)
}

#[cfg(test)]
mod tests {
    use super::*;
    use ed25519_dalek::SigningKey;
    use rand_core::OsRng;
    use std::str::FromStr;

    fn sample_did() -> Did {
        Did::from_str("did:sage:ethereum:0xabcd000000000000000000000000000000001234").unwrap()
    }

    #[test]
    fn pop_round_trips_for_ed25519() {
        let signing = SigningKey::generate(&mut OsRng);
        let private = PrivateKey::Ed25519(signing.clone());
        let public = PublicKey::Ed25519(signing.verifying_key());
        let did = sample_did();

        let signature = sign_pop(&private, &did).unwrap();
        let public_key_bytes = private.public_key_bytes();
        assert!(verify_pop(&public, &public_key_bytes, &did, &signature).unwrap());
    }

    #[test]
    fn pop_fails_for_wrong_did() {
        let signing = SigningKey::generate(&mut OsRng);
        let private = PrivateKey::Ed25519(signing.clone());
        let public = PublicKey::Ed25519(signing.verifying_key());
        let did = sample_did();
        let other_did =
            Did::from_str("did:sage:ethereum:0x0000000000000000000000000000000000dead").unwrap();

        let signature = sign_pop(&private, &did).unwrap();
        let public_key_bytes = private.public_key_bytes();
        assert!(!verify_pop(&public, &public_key_bytes, &other_did, &signature).unwrap());
    }

    #[test]
    fn x25519_rejects_pop() {
        let private = PrivateKey::X25519([1u8; 32]);
        assert!(sign_pop(&private, &sample_did()).is_err());
    }
}
