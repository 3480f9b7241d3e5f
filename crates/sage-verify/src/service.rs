//! The Verification Service: resolve → verify → enforce (spec.md §4.4).

use std::collections::BTreeMap;
use std::sync::Arc;

use chrono::Utc;
use tokio_util::sync::CancellationToken;

use sage_crypto::PublicKey;
use sage_resolver::{Resolver, ResolverError};
use sage_types::{CapabilityValue, Message};

use crate::error::VerifyError;
use crate::options::VerificationOptions;
use crate::outcome::VerifierVerdict;
use crate::result::VerificationResult;
use crate::verifier::Verifier;

/// Orchestrates a DID resolution, the [`Verifier`]'s checks, and metadata
/// enforcement into the single "is this message authentically from this
/// agent?" answer.
pub struct VerificationService {
    resolver: Arc<Resolver>,
}

impl VerificationService {
    /// Builds a service over `resolver`.
    pub fn new(resolver: Arc<Resolver>) -> Self {
        VerificationService { resolver }
    }

    /// Answers whether `message` is authentically from the agent it claims
    /// to be from, per `options`.
    ///
    /// A `NotFound` lookup is downgraded to `{valid: false, error: Some("unknown
    /// agent")}`; every other resolver error propagates (spec.md §7). Bad
    /// signatures, stale timestamps, metadata mismatches, and missing
    /// capabilities are never errors — they are encoded in the returned
    /// [`VerificationResult`].
    #[tracing::instrument(skip(self, message, cancel), fields(agent_did = %message.agent_did()))]
    pub async fn verify(
        &self,
        message: &Message,
        options: &VerificationOptions,
        cancel: &CancellationToken,
    ) -> Result<VerificationResult, VerifyError> {
        let verified_at = Utc::now();

        let metadata = match self.resolver.resolve(&message.agent_did().to_string(), cancel).await {
            Ok(metadata) => metadata,
            Err(ResolverError::NotFound(_)) => {
                tracing::warn!("rejected: unknown agent");
                return Ok(VerificationResult::rejected("unknown agent", verified_at));
            }
            Err(err) => return Err(err.into()),
        };

        if options.require_active_agent && !metadata.is_active() {
            tracing::warn!(agent = %metadata.did(), "rejected: deactivated agent");
            return Ok(VerificationResult {
                valid: false,
                error: Some("deactivated".to_string()),
                agent_id: Some(metadata.did().to_string()),
                agent_name: Some(metadata.name().to_string()),
                agent_owner: Some(metadata.owner().to_string()),
                capabilities: metadata.capabilities().clone(),
                verified_at,
            });
        }

        let Some(signing_key) = metadata.keys().iter().find(|key| key.is_verified_signing_key()) else {
            tracing::warn!(agent = %metadata.did(), "rejected: no verified signing key");
            return Ok(VerificationResult {
                valid: false,
                error: Some("no verified signing key".to_string()),
                agent_id: Some(metadata.did().to_string()),
                agent_name: Some(metadata.name().to_string()),
                agent_owner: Some(metadata.owner().to_string()),
                capabilities: metadata.capabilities().clone(),
                verified_at,
            });
        };

        let public_key = match PublicKey::decode(signing_key.key_type(), signing_key.public_key()) {
            Ok(key) => key,
            Err(err) => {
                tracing::warn!(agent = %metadata.did(), %err, "rejected: undecodable signing key");
                return Ok(VerificationResult {
                    valid: false,
                    error: Some(err.to_string()),
                    agent_id: Some(metadata.did().to_string()),
                    agent_name: Some(metadata.name().to_string()),
                    agent_owner: Some(metadata.owner().to_string()),
                    capabilities: metadata.capabilities().clone(),
                    verified_at,
                });
            }
        };

        // A copy the agent's on-chain capabilities are merged into; the
        // caller's message.metadata() is never mutated (spec.md §9 Open
        // Question 4).
        let mut message_metadata = message.metadata_for_verification();
        message_metadata
            .entry("capabilities".to_string())
            .or_insert_with(|| CapabilityValue::Map(metadata.capabilities().clone()));

        let mut expected_metadata = BTreeMap::new();
        if let Some(endpoint) = metadata.endpoint() {
            expected_metadata.insert("endpoint".to_string(), CapabilityValue::Text(endpoint.to_string()));
        }
        expected_metadata.insert("name".to_string(), CapabilityValue::Text(metadata.name().to_string()));

        let verdict = Verifier::verify(message, &public_key, &message_metadata, options, &expected_metadata);

        let (valid, error) = match verdict {
            VerifierVerdict::Valid => {
                tracing::debug!(agent = %metadata.did(), "verified");
                (true, None)
            }
            VerifierVerdict::Invalid(reason) => {
                tracing::warn!(agent = %metadata.did(), reason, "rejected");
                (false, Some(reason))
            }
        };

        Ok(VerificationResult {
            valid,
            error,
            agent_id: Some(metadata.did().to_string()),
            agent_name: Some(metadata.name().to_string()),
            agent_owner: Some(metadata.owner().to_string()),
            capabilities: metadata.capabilities().clone(),
            verified_at,
        })
    }
}
