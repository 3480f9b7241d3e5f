//! Ethereum address derivation (spec.md §4.5, §8 property 7).
//!
//! `address = last 20 bytes of Keccak-256(X‖Y)`, lowercase-hex, `0x`-prefixed,
//! where `X‖Y` are the 64-byte uncompressed affine coordinates of a
//! secp256k1 public key.

use sha3::{Digest, Keccak256};

use crate::error::CryptoError;
use crate::key::PublicKey;

/// Derives the canonical Ethereum address for a secp256k1 public key.
///
/// Fails with [`CryptoError::NotASecp256k1Key`] for any other key variant.
pub fn derive_eth_address(public_key: &PublicKey) -> Result<String, CryptoError> {
    let xy = public_key.secp256k1_xy()?;
    Ok(derive_eth_address_from_xy(&xy))
}

/// Derives the canonical Ethereum address directly from 64-byte `X‖Y`
/// affine coordinates, without requiring a decoded [`PublicKey`].
pub fn derive_eth_address_from_xy(xy: &[u8; 64]) -> String {
    let hash = Keccak256::digest(xy);
    format!("0x{}", hex::encode(&hash[12..]))
}
