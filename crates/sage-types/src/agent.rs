//! On-chain agent metadata: the snapshot a [`sage-resolver`](https://docs.rs/sage-resolver)
//! backend returns for a given [`Did`](crate::did::Did).

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::did::Did;
use crate::error::MetadataError;
use crate::key::AgentKey;

/// A capability map value. Capability maps are untyped JSON in the wire
/// format; this tags the handful of shapes the trust kernel actually
/// compares (see SPEC_FULL.md's note on untyped metadata maps) rather than
/// carrying a raw `serde_json::Value`, so capability equality is defined
/// over a closed set of variants instead of arbitrary JSON structural
/// equality.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CapabilityValue {
    /// A boolean flag, e.g. `"streaming": true`.
    Bool(bool),
    /// An integer-valued capability, e.g. a rate limit or version number.
    Int(i64),
    /// A free-text capability value.
    Text(String),
    /// A list of capability values.
    List(Vec<CapabilityValue>),
    /// A nested capability map, compared the same way as the top-level map:
    /// order-insensitive by key, case-sensitive on both keys and values.
    Map(BTreeMap<String, CapabilityValue>),
}

/// An agent's on-chain metadata, as returned by a chain resolver.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AgentMetadata {
    did: Did,
    /// The chain-native address that owns (can update) this agent's registration.
    owner: String,
    name: String,
    description: Option<String>,
    endpoint: Option<String>,
    keys: Vec<AgentKey>,
    capabilities: BTreeMap<String, CapabilityValue>,
    active: bool,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl AgentMetadata {
    /// Constructs a metadata snapshot, enforcing:
    /// - `owner` is a valid address on the agent's own chain (spec.md §3)
    /// - `updated_at >= created_at`
    /// - if `active`, at least one key is a [verified signing
    ///   key](crate::key::AgentKey::is_verified_signing_key)
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        did: Did,
        owner: String,
        name: String,
        description: Option<String>,
        endpoint: Option<String>,
        keys: Vec<AgentKey>,
        capabilities: BTreeMap<String, CapabilityValue>,
        active: bool,
        created_at: DateTime<Utc>,
        updated_at: DateTime<Utc>,
    ) -> Result<Self, MetadataError> {
        let owner = crate::did::normalize_address(did.chain(), &owner)
            .map_err(|_| MetadataError::InvalidOwner(owner))?;
        if updated_at < created_at {
            return Err(MetadataError::TimestampsNotMonotonic {
                created: created_at.to_rfc3339(),
                updated: updated_at.to_rfc3339(),
            });
        }
        if active && !keys.iter().any(AgentKey::is_verified_signing_key) {
            return Err(MetadataError::NoVerifiedSigningKey);
        }
        Ok(AgentMetadata {
            did,
            owner,
            name,
            description,
            endpoint,
            keys,
            capabilities,
            active,
            created_at,
            updated_at,
        })
    }

    /// The agent's identifier.
    pub fn did(&self) -> &Did {
        &self.did
    }

    /// The chain-native address authorized to update this registration.
    pub fn owner(&self) -> &str {
        &self.owner
    }

    /// Human-readable agent name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Optional free-text description.
    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    /// Optional message endpoint URL.
    pub fn endpoint(&self) -> Option<&str> {
        self.endpoint.as_deref()
    }

    /// Every key registered to this agent.
    pub fn keys(&self) -> &[AgentKey] {
        &self.keys
    }

    /// The agent's capability map.
    pub fn capabilities(&self) -> &BTreeMap<String, CapabilityValue> {
        &self.capabilities
    }

    /// `false` if the agent has been deactivated by its owner.
    pub fn is_active(&self) -> bool {
        self.active
    }

    /// When this registration was first created.
    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// When this registration was last updated.
    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    /// Finds a registered key by its exact public key bytes.
    pub fn find_key(&self, public_key: &[u8]) -> Option<&AgentKey> {
        self.keys.iter().find(|k| k.public_key() == public_key)
    }
}
