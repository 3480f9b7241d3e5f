//! Signature primitives for the SAGE trust kernel.
//!
//! This crate owns everything that touches actual key material: algorithm
//! dispatch over an RFC-9421 or partial signature base ([`algorithm`]),
//! polymorphic key decoding ([`key`]), proof-of-possession challenges
//! ([`pop`]), W3C Agent Card detached proofs ([`agent_card`]), and
//! Ethereum address derivation ([`keccak`]). `sage-canon` builds the bytes
//! this crate signs and verifies; it performs no cryptography itself.
//!
//! # Modules
//!
//! - [`algorithm`] — wire algorithm tags and their dispatch table.
//! - [`key`] — [`key::PublicKey`]/[`key::PrivateKey`] variants over Ed25519,
//!   secp256k1, P-256, RSA, and X25519.
//! - [`partial_base`] — the project-specific signed-field message base.
//! - [`pop`] — per-key proof-of-possession signing and verification.
//! - [`agent_card`] — [`agent_card::AgentCard`] construction and detached proofs.
//! - [`keccak`] — secp256k1-to-Ethereum-address derivation.
//! - [`error`] — this crate's error taxonomy.

pub mod agent_card;
pub mod algorithm;
pub mod error;
pub mod key;
pub mod keccak;
pub mod partial_base;
pub mod pop;

pub use agent_card::{AgentCard, Proof, PublicKeyEntry, ServiceEntry, sign_card, verify_card_proof};
pub use algorithm::{Algorithm, verify_signature};
pub use error::CryptoError;
pub use key::{PrivateKey, PublicKey};
pub use keccak::derive_eth_address;
pub use partial_base::{build_body_only_base, build_partial_base};
pub use pop::{sign_pop, verify_pop};
