//! The `ChainResolver` capability interface (spec.md §6 "Chain backends").
//!
//! The core consumes chain-specific registries through this narrow trait
//! and makes no assumptions about on-chain encoding, RPC transport, or
//! contract ABI — those are the out-of-scope collaborators named in
//! spec.md §1. The broader interface spec.md §6 lists for a real backend
//! (`Register`, `Update`, `Deactivate`, `GetRegistrationStatus`, ...) is a
//! mutation-path contract this repository does not implement or require;
//! only the read path the trust kernel actually calls is captured here.

use sage_types::{AgentMetadata, Chain};

use crate::error::ResolverError;

/// Criteria for a [`ChainResolver::search`] call.
#[derive(Debug, Clone, Default)]
pub struct SearchCriteria {
    /// Case-sensitive substring match against an agent's name, if set.
    pub name_contains: Option<String>,
    /// An agent must advertise this capability key to match, if set.
    pub capability: Option<String>,
    /// Applied by the caller (`Resolver::search`) after aggregating every
    /// backend's results, per spec.md §4.3 — individual backends may
    /// ignore this field.
    pub limit: Option<usize>,
}

/// A chain-specific backend adapter.
///
/// Implementations are external collaborators (spec.md §1 Non-goals): this
/// repository provides the trait and in-memory test doubles only.
#[async_trait::async_trait]
pub trait ChainResolver: Send + Sync {
    /// The chain this resolver answers for.
    fn chain(&self) -> Chain;

    /// Resolves a single DID to its on-chain metadata snapshot.
    async fn resolve(&self, did: &sage_types::Did) -> Result<AgentMetadata, ResolverError>;

    /// Every agent registration owned by `owner` on this chain.
    async fn list_by_owner(&self, owner: &str) -> Result<Vec<AgentMetadata>, ResolverError>;

    /// Every agent registration on this chain matching `criteria`.
    async fn search(&self, criteria: &SearchCriteria) -> Result<Vec<AgentMetadata>, ResolverError>;
}
