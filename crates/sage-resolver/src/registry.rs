//! `ChainRegistry`: the composition root's map from [`Chain`] to its backend.
//!
//! Insertion-order-backed (a `Vec`, not a `HashMap`) so that "query every
//! configured chain resolver in an unspecified but deterministic order"
//! (spec.md §4.3) is actually deterministic across runs — `HashMap`
//! iteration order is not.

use std::sync::Arc;

use sage_types::Chain;

use crate::chain_resolver::ChainResolver;

/// The set of chain backends a [`crate::resolver::Resolver`] dispatches to.
#[derive(Clone, Default)]
pub struct ChainRegistry {
    resolvers: Vec<Arc<dyn ChainResolver>>,
}

impl ChainRegistry {
    /// An empty registry.
    pub fn new() -> Self {
        ChainRegistry::default()
    }

    /// Registers a backend, appending it to the deterministic fan-out order.
    pub fn register(&mut self, resolver: Arc<dyn ChainResolver>) -> &mut Self {
        self.resolvers.push(resolver);
        self
    }

    /// Builder-style variant of [`ChainRegistry::register`].
    pub fn with(mut self, resolver: Arc<dyn ChainResolver>) -> Self {
        self.register(resolver);
        self
    }

    /// The backend registered for `chain`, if any. When more than one
    /// backend is registered for the same chain, the first registered wins.
    pub fn by_chain(&self, chain: Chain) -> Option<&Arc<dyn ChainResolver>> {
        self.resolvers.iter().find(|r| r.chain() == chain)
    }

    /// Every registered backend, in registration (deterministic) order.
    pub fn resolvers(&self) -> impl Iterator<Item = &Arc<dyn ChainResolver>> {
        self.resolvers.iter()
    }

    /// `true` if no backend has been registered for any chain.
    pub fn is_empty(&self) -> bool {
        self.resolvers.is_empty()
    }
}
