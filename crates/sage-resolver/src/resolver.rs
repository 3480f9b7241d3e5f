//! The `Resolver`: DID parsing, chain dispatch, retry, and caching
//! orchestrated together (spec.md §4.3).

use std::time::Duration;

use tokio_util::sync::CancellationToken;

use sage_types::{AgentKey, AgentMetadata, Did, DidError};

use crate::cache::MetadataCache;
use crate::chain_resolver::{ChainResolver, SearchCriteria};
use crate::error::ResolverError;
use crate::registry::ChainRegistry;

/// Parses the `<address>[:<nonce>]` tail of a `did:sage:<chain>:...` string
/// without validating the chain token, for the "chain unknown" fan-out path
/// (spec.md §4.3 step 2). Returns `None` if the string isn't even
/// `did:sage:<chain>:<address>`-shaped.
fn raw_address_and_nonce(did_text: &str) -> Option<(String, Option<u64>)> {
    let mut parts = did_text.split(':');
    if parts.next()? != "did" || parts.next()? != "sage" {
        return None;
    }
    let _chain_token = parts.next()?;
    let address = parts.next()?.to_string();
    let nonce = match parts.next() {
        None => None,
        Some(n) => n.parse::<u64>().ok(),
    };
    Some((address, nonce))
}

/// Maps a DID to its on-chain metadata: parses, dispatches to the right
/// chain backend (retrying transient failures), and caches the result.
pub struct Resolver {
    registry: ChainRegistry,
    cache: MetadataCache,
    max_retries: u32,
    retry_backoff: Duration,
}

impl Resolver {
    /// Builds a resolver over `registry`, with a cache bounded to
    /// `max_cache_items` entries valid for `cache_ttl`, retrying a backend
    /// failure up to `max_retries` times with a fixed `retry_backoff`
    /// between attempts (spec.md §7 Recovery policy).
    pub fn new(
        registry: ChainRegistry,
        max_cache_items: usize,
        cache_ttl: Duration,
        max_retries: u32,
        retry_backoff: Duration,
    ) -> Self {
        Resolver {
            registry,
            cache: MetadataCache::new(max_cache_items, cache_ttl),
            max_retries,
            retry_backoff,
        }
    }

    /// Purges expired cache entries. Intended to be driven by a periodic
    /// task (spec.md §4.3 "cleanup operation"); does not block resolution.
    pub fn cleanup_cache(&self) {
        self.cache.cleanup();
    }

    /// Resolves `did_text` to an agent metadata snapshot.
    ///
    /// If `did_text` parses with a recognized chain, dispatches directly to
    /// that chain's backend (consulting the cache first). If it parses
    /// except for an unrecognized chain token, fans out across every
    /// registered backend in registration order and returns the first
    /// success (spec.md §4.3 steps 1–2). Any other parse failure is raised
    /// immediately.
    #[tracing::instrument(skip(self, cancel), fields(did = %did_text))]
    pub async fn resolve(
        &self,
        did_text: &str,
        cancel: &CancellationToken,
    ) -> Result<AgentMetadata, ResolverError> {
        match did_text.parse::<Did>() {
            Ok(did) => self.resolve_known(&did, cancel).await,
            Err(DidError::UnknownChain(_)) => self.resolve_by_fanout(did_text, cancel).await,
            Err(other) => Err(ResolverError::InvalidDidFormat(other)),
        }
    }

    async fn resolve_known(
        &self,
        did: &Did,
        cancel: &CancellationToken,
    ) -> Result<AgentMetadata, ResolverError> {
        if let Some(cached) = self.cache.get(did) {
            return Ok(cached);
        }
        let resolver = self
            .registry
            .by_chain(did.chain())
            .ok_or_else(|| ResolverError::ChainNotConfigured(did.chain().to_string()))?
            .clone();
        let metadata = self.call_with_retry(resolver.as_ref(), did, cancel).await?;
        self.cache.insert(did.clone(), metadata.clone());
        Ok(metadata)
    }

    async fn resolve_by_fanout(
        &self,
        did_text: &str,
        cancel: &CancellationToken,
    ) -> Result<AgentMetadata, ResolverError> {
        let Some((address, nonce)) = raw_address_and_nonce(did_text) else {
            return Err(ResolverError::UnknownChain(did_text.to_string()));
        };
        for resolver in self.registry.resolvers() {
            if cancel.is_cancelled() {
                return Err(ResolverError::Cancelled);
            }
            let Ok(did) = Did::new(resolver.chain(), &address, nonce) else {
                continue;
            };
            if let Ok(metadata) = self.call_with_retry(resolver.as_ref(), &did, cancel).await {
                self.cache.insert(did, metadata.clone());
                return Ok(metadata);
            }
        }
        Err(ResolverError::NotFound(did_text.to_string()))
    }

    /// Resolves the agent's primary verified signing key. A shortcut over
    /// [`Resolver::resolve`]; fails with [`ResolverError::InactiveAgent`]
    /// rather than returning a key for a deactivated agent.
    pub async fn resolve_public_key(
        &self,
        did_text: &str,
        cancel: &CancellationToken,
    ) -> Result<AgentKey, ResolverError> {
        let metadata = self.resolve(did_text, cancel).await?;
        if !metadata.is_active() {
            return Err(ResolverError::InactiveAgent(metadata.did().to_string()));
        }
        metadata
            .keys()
            .iter()
            .find(|key| key.is_verified_signing_key())
            .cloned()
            .ok_or_else(|| ResolverError::NotFound(metadata.did().to_string()))
    }

    /// Fans out `owner` across every registered chain backend and returns
    /// the union of results. Per-backend failures are suppressed
    /// (best-effort), per spec.md §4.3 "Multi-chain aggregation".
    pub async fn list_by_owner(&self, owner: &str) -> Vec<AgentMetadata> {
        let mut out = Vec::new();
        for resolver in self.registry.resolvers() {
            match resolver.list_by_owner(owner).await {
                Ok(mut results) => out.append(&mut results),
                Err(err) => tracing::debug!(owner, chain = %resolver.chain(), %err, "list_by_owner backend failed, suppressed"),
            }
        }
        out
    }

    /// Fans out `criteria` across every registered chain backend, unions
    /// the results, then applies `criteria.limit` to the aggregate — not
    /// per-backend, per spec.md §4.3.
    pub async fn search(&self, criteria: &SearchCriteria) -> Vec<AgentMetadata> {
        let mut out = Vec::new();
        for resolver in self.registry.resolvers() {
            match resolver.search(criteria).await {
                Ok(mut results) => out.append(&mut results),
                Err(err) => tracing::debug!(chain = %resolver.chain(), %err, "search backend failed, suppressed"),
            }
        }
        if let Some(limit) = criteria.limit {
            out.truncate(limit);
        }
        out
    }

    async fn call_with_retry(
        &self,
        resolver: &dyn ChainResolver,
        did: &Did,
        cancel: &CancellationToken,
    ) -> Result<AgentMetadata, ResolverError> {
        let mut attempt = 0;
        loop {
            if cancel.is_cancelled() {
                return Err(ResolverError::Cancelled);
            }
            match resolver.resolve(did).await {
                Ok(metadata) => return Ok(metadata),
                Err(err) => {
                    let retryable = matches!(err, ResolverError::BackendUnavailable(_));
                    if !retryable || attempt >= self.max_retries {
                        if retryable {
                            tracing::error!(%did, %err, "chain backend unavailable after retries");
                        }
                        return Err(err);
                    }
                    attempt += 1;
                    tracing::warn!(%did, attempt, %err, "resolve failed, retrying after backoff");
                    tokio::select! {
                        _ = tokio::time::sleep(self.retry_backoff) => {}
                        _ = cancel.cancelled() => return Err(ResolverError::Cancelled),
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use sage_types::{Chain, KeyType, PopStatus};
    use std::collections::BTreeMap;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;
    use std::sync::Mutex;

    /// An in-memory [`ChainResolver`] test double: the `InMemoryReplayStore`
    /// of this trust kernel's resolver tests. Never used outside `#[cfg(test)]`.
    struct FakeChainResolver {
        chain: Chain,
        agents: Mutex<Vec<AgentMetadata>>,
        fail_n_times: AtomicUsize,
    }

    impl FakeChainResolver {
        fn new(chain: Chain, agents: Vec<AgentMetadata>) -> Self {
            FakeChainResolver {
                chain,
                agents: Mutex::new(agents),
                fail_n_times: AtomicUsize::new(0),
            }
        }

        fn failing(chain: Chain, times: usize) -> Self {
            FakeChainResolver {
                chain,
                agents: Mutex::new(Vec::new()),
                fail_n_times: AtomicUsize::new(times),
            }
        }
    }

    #[async_trait::async_trait]
    impl ChainResolver for FakeChainResolver {
        fn chain(&self) -> Chain {
            self.chain
        }

        async fn resolve(&self, did: &Did) -> Result<AgentMetadata, ResolverError> {
            let remaining = self.fail_n_times.load(Ordering::SeqCst);
            if remaining > 0 {
                self.fail_n_times.fetch_sub(1, Ordering::SeqCst);
                return Err(ResolverError::BackendUnavailable("simulated outage".into()));
            }
            self.agents
                .lock()
                .unwrap()
                .iter()
                .find(|a| a.did() == did)
                .cloned()
                .ok_or_else(|| ResolverError::NotFound(did.to_string()))
        }

        async fn list_by_owner(&self, owner: &str) -> Result<Vec<AgentMetadata>, ResolverError> {
            Ok(self
                .agents
                .lock()
                .unwrap()
                .iter()
                .filter(|a| a.owner() == owner)
                .cloned()
                .collect())
        }

        async fn search(&self, criteria: &SearchCriteria) -> Result<Vec<AgentMetadata>, ResolverError> {
            Ok(self
                .agents
                .lock()
                .unwrap()
                .iter()
                .filter(|a| {
                    criteria
                        .name_contains
                        .as_ref()
                        .is_none_or(|needle| a.name().contains(needle.as_str()))
                })
                .cloned()
                .collect())
        }
    }

    fn sample_agent(chain: Chain, address: &str, owner: &str, name: &str) -> AgentMetadata {
        let did = Did::new(chain, address, None).unwrap();
        let key = AgentKey::new(KeyType::Ed25519, vec![7u8; 32], PopStatus::Verified).unwrap();
        let now = Utc::now();
        AgentMetadata::new(
            did,
            owner.to_string(),
            name.to_string(),
            None,
            None,
            vec![key],
            BTreeMap::new(),
            true,
            now,
            now,
        )
        .unwrap()
    }

    fn resolver_with(registry: ChainRegistry) -> Resolver {
        Resolver::new(registry, 100, Duration::from_secs(60), 2, Duration::from_millis(1))
    }

    #[tokio::test]
    async fn resolves_known_chain_and_caches() {
        let agent = sample_agent(
            Chain::Ethereum,
            "0x0000000000000000000000000000000000dead",
            &format!("0x{}", "a".repeat(40)),
            "agent-1",
        );
        let backend = Arc::new(FakeChainResolver::new(Chain::Ethereum, vec![agent.clone()]));
        let registry = ChainRegistry::new().with(backend);
        let resolver = resolver_with(registry);
        let cancel = CancellationToken::new();

        let resolved = resolver.resolve(&agent.did().to_string(), &cancel).await.unwrap();
        assert_eq!(resolved, agent);
    }

    #[tokio::test]
    async fn unconfigured_chain_is_an_error() {
        let registry = ChainRegistry::new();
        let resolver = resolver_with(registry);
        let cancel = CancellationToken::new();
        let err = resolver
            .resolve(
                "did:sage:ethereum:0x0000000000000000000000000000000000dead",
                &cancel,
            )
            .await
            .unwrap_err();
        assert!(matches!(err, ResolverError::ChainNotConfigured(_)));
    }

    #[tokio::test]
    async fn unknown_chain_fans_out_to_first_success() {
        let agent = sample_agent(
            Chain::Solana,
            &bs58::encode([9u8; 32]).into_string(),
            &bs58::encode([8u8; 32]).into_string(),
            "agent-sol",
        );
        let eth_backend = Arc::new(FakeChainResolver::new(Chain::Ethereum, vec![]));
        let sol_backend = Arc::new(FakeChainResolver::new(Chain::Solana, vec![agent.clone()]));
        let registry = ChainRegistry::new().with(eth_backend).with(sol_backend);
        let resolver = resolver_with(registry);
        let cancel = CancellationToken::new();

        let did_text = format!("did:sage:unknownchain:{}", agent.did().address());
        let resolved = resolver.resolve(&did_text, &cancel).await.unwrap();
        assert_eq!(resolved, agent);
    }

    #[tokio::test]
    async fn malformed_did_does_not_fan_out() {
        let registry = ChainRegistry::new();
        let resolver = resolver_with(registry);
        let cancel = CancellationToken::new();
        let err = resolver.resolve("did:sage", &cancel).await.unwrap_err();
        assert!(matches!(err, ResolverError::InvalidDidFormat(_)));
    }

    #[tokio::test]
    async fn backend_failure_retries_then_succeeds() {
        let agent = sample_agent(
            Chain::Ethereum,
            "0x0000000000000000000000000000000000dead",
            &format!("0x{}", "a".repeat(40)),
            "agent-1",
        );
        let backend = Arc::new(FakeChainResolver::failing(Chain::Ethereum, 1));
        backend.agents.lock().unwrap().push(agent.clone());
        let registry = ChainRegistry::new().with(backend);
        let resolver = resolver_with(registry);
        let cancel = CancellationToken::new();

        let resolved = resolver.resolve(&agent.did().to_string(), &cancel).await.unwrap();
        assert_eq!(resolved, agent);
    }

    #[tokio::test]
    async fn backend_failure_exhausts_retries() {
        let backend = Arc::new(FakeChainResolver::failing(Chain::Ethereum, 10));
        let registry = ChainRegistry::new().with(backend);
        let resolver = resolver_with(registry);
        let cancel = CancellationToken::new();
        let err = resolver
            .resolve(
                "did:sage:ethereum:0x0000000000000000000000000000000000dead",
                &cancel,
            )
            .await
            .unwrap_err();
        assert!(matches!(err, ResolverError::BackendUnavailable(_)));
    }

    #[tokio::test]
    async fn cancellation_is_honored_before_backend_call() {
        let backend = Arc::new(FakeChainResolver::new(Chain::Ethereum, vec![]));
        let registry = ChainRegistry::new().with(backend);
        let resolver = resolver_with(registry);
        let cancel = CancellationToken::new();
        cancel.cancel();
        let err = resolver
            .resolve(
                "did:sage:ethereum:0x0000000000000000000000000000000000dead",
                &cancel,
            )
            .await
            .unwrap_err();
        assert!(matches!(err, ResolverError::Cancelled));
    }

    #[tokio::test]
    async fn resolve_public_key_fails_for_inactive_agent() {
        let did = Did::new(Chain::Ethereum, "0x0000000000000000000000000000000000dead", None).unwrap();
        let inactive = AgentMetadata::new(
            did,
            format!("0x{}", "a".repeat(40)),
            "agent-1".into(),
            None,
            None,
            vec![],
            BTreeMap::new(),
            false,
            Utc::now(),
            Utc::now(),
        )
        .unwrap();
        let backend = Arc::new(FakeChainResolver::new(Chain::Ethereum, vec![inactive.clone()]));
        let registry = ChainRegistry::new().with(backend);
        let resolver = resolver_with(registry);
        let cancel = CancellationToken::new();

        let err = resolver
            .resolve_public_key(&inactive.did().to_string(), &cancel)
            .await
            .unwrap_err();
        assert!(matches!(err, ResolverError::InactiveAgent(_)));
    }

    #[tokio::test]
    async fn list_by_owner_fans_out_across_chains_and_matches_only_the_owning_backend() {
        let eth_owner = format!("0x{}", "e".repeat(40));
        let sol_owner = bs58::encode([5u8; 32]).into_string();
        let eth_agent = sample_agent(
            Chain::Ethereum,
            "0x0000000000000000000000000000000000aaaa",
            &eth_owner,
            "eth-agent",
        );
        let sol_agent = sample_agent(
            Chain::Solana,
            &bs58::encode([6u8; 32]).into_string(),
            &sol_owner,
            "sol-agent",
        );
        let eth_backend = Arc::new(FakeChainResolver::new(Chain::Ethereum, vec![eth_agent.clone()]));
        let sol_backend = Arc::new(FakeChainResolver::new(Chain::Solana, vec![sol_agent.clone()]));
        let registry = ChainRegistry::new().with(eth_backend).with(sol_backend);
        let resolver = resolver_with(registry);

        // Each call fans out across both backends; only the owning chain's
        // backend actually has a matching record (spec.md §4.3 "best-effort
        // union" also covers the degenerate case where just one contributes).
        assert_eq!(resolver.list_by_owner(&eth_owner).await, vec![eth_agent]);
        assert_eq!(resolver.list_by_owner(&sol_owner).await, vec![sol_agent]);
    }

    #[tokio::test]
    async fn search_applies_limit_after_aggregation() {
        let owner = format!("0x{}", "0".repeat(40));
        let a = sample_agent(Chain::Ethereum, "0x0000000000000000000000000000000000aaaa", &owner, "match-a");
        let b = sample_agent(Chain::Ethereum, "0x0000000000000000000000000000000000bbbb", &owner, "match-b");
        let backend = Arc::new(FakeChainResolver::new(Chain::Ethereum, vec![a, b]));
        let registry = ChainRegistry::new().with(backend);
        let resolver = resolver_with(registry);

        let criteria = SearchCriteria {
            name_contains: Some("match".to_string()),
            capability: None,
            limit: Some(1),
        };
        let results = resolver.search(&criteria).await;
        assert_eq!(results.len(), 1);
    }
}
