//! Leaf data model for the SAGE trust kernel.
//!
//! This crate defines the types every other `sage-*` crate builds on: the
//! [`Did`] identifier, the [`AgentKey`]/[`AgentMetadata`] on-chain snapshot,
//! the [`Message`] the verifier consumes, and the shared error taxonomy.
//! Nothing here performs I/O or cryptography — those live in
//! [`sage-resolver`](https://docs.rs/sage-resolver) and
//! [`sage-crypto`](https://docs.rs/sage-crypto) respectively.
//!
//! # Modules
//!
//! - [`did`] — DID parsing, chain identification, canonical serialization.
//! - [`key`] — [`KeyType`] and [`AgentKey`], the per-key proof-of-possession carrier.
//! - [`agent`] — [`AgentMetadata`] and the [`CapabilityValue`] tagged variant.
//! - [`message`] — the verifier's input envelope and its field invariants.
//! - [`error`] — the input-error taxonomy raised by this crate.

pub mod agent;
pub mod did;
pub mod error;
pub mod key;
pub mod message;

pub use agent::{AgentMetadata, CapabilityValue};
pub use did::{Chain, Did};
pub use error::{DidError, KeyError, MessageError, MetadataError};
pub use key::{AgentKey, KeyType, PopStatus};
pub use message::Message;
