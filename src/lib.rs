//! SAGE (Secure Agent Guarantee Engine) trust kernel.
//!
//! This crate is the composition root for the trust kernel's pipeline: it
//! takes an inbound signed [`Message`](sage_types::Message) claiming to
//! originate from an agent identified by a [`Did`](sage_types::Did) and
//! decides whether that message is authentic, fresh, authorized, and
//! uttered by an agent whose on-chain registration matches the claimed
//! metadata (spec.md §1).
//!
//! # Overview
//!
//! The kernel is split into six crates, each re-exported here so a caller
//! depends on one crate:
//!
//! - [`sage_types`] — the [`Did`](sage_types::Did), [`AgentMetadata`](sage_types::AgentMetadata),
//!   [`Message`](sage_types::Message) data model and the shared error taxonomy.
//! - [`sage_canon`] — RFC-9421 HTTP signature base construction.
//! - [`sage_crypto`] — algorithm dispatch, proof-of-possession, Agent Card
//!   proofs, and Ethereum address derivation.
//! - [`sage_resolver`] — the [`Resolver`](sage_resolver::Resolver) and its
//!   bounded TTL cache over a [`ChainRegistry`](sage_resolver::ChainRegistry)
//!   of chain backends.
//! - [`sage_validator`] — per-session replay/freshness/ordering tracking.
//! - [`sage_verify`] — the [`VerificationService`](sage_verify::VerificationService)
//!   orchestrator and the [`quick_verify`](sage_verify::quick_verify) fast path.
//!
//! # Modules
//!
//! - [`config`] — composition-root configuration structs for the resolver,
//!   validator, and verification policy (spec.md §9 "Global initialization
//!   registry": no env-var or file parsing inside the core itself).
//! - [`telemetry`] — `tracing` subscriber initialization for binaries that
//!   embed this crate.
//!
//! # Example
//!
//! ```
//! use sage::config::ValidatorConfig;
//! use sage_validator::Validator;
//!
//! let config = ValidatorConfig::default();
//! let validator = Validator::new(
//!     config.timestamp_tolerance(),
//!     config.max_out_of_order_window,
//!     config.nonce_ttl,
//!     config.duplicate_ttl,
//! );
//! ```

pub mod config;
pub mod telemetry;

pub use sage_canon::{
    CanonError, CoveredComponent, SignatureBaseRequest, SignatureInputParams, SignatureParams,
    build_signature_base,
};
pub use sage_crypto::{
    AgentCard, Algorithm, CryptoError, PrivateKey, PublicKey, derive_eth_address, sign_card,
    sign_pop, verify_card_proof, verify_pop, verify_signature,
};
pub use sage_resolver::{ChainRegistry, ChainResolver, MetadataCache, Resolver, ResolverError, SearchCriteria};
pub use sage_types::{
    AgentKey, AgentMetadata, CapabilityValue, Chain, Did, KeyType, Message, PopStatus,
};
pub use sage_validator::{PacketCheck, ValidationFailure, ValidationOutcome, Validator};
pub use sage_verify::{
    VerificationOptions, VerificationResult, VerificationService, Verifier, VerifierVerdict,
    VerifyError, quick_verify, verify_http_signature,
};
