//! The minimal verification fast path (spec.md §4.4 "QuickVerify").
//!
//! `quick_verify` infers the signing algorithm from the DID's chain
//! (`ethereum` → ECDSA-secp256k1, `solana` → EdDSA), resolves only the
//! agent's public key, and checks a signature over the single-field `body`
//! base — nothing else. It does not resolve metadata, does not enforce
//! agent activity, and does not check timestamps: callers that need those
//! guarantees use [`crate::service::VerificationService`] instead.

use tokio_util::sync::CancellationToken;

use sage_crypto::{PublicKey, build_body_only_base, verify_signature};
use sage_resolver::Resolver;
use sage_types::{Chain, Message};

use crate::error::VerifyError;

/// Infers the RFC-9421-style algorithm tag [`sage_crypto::algorithm::verify_signature`]
/// expects from a DID's chain, per spec.md §4.4.
fn inferred_algorithm_tag(chain: Chain) -> &'static str {
    match chain {
        Chain::Ethereum => "ECDSA-secp256k1",
        Chain::Solana => "EdDSA",
    }
}

/// Verifies `message`'s signature over its body alone, resolving only the
/// signer's public key and skipping every policy check the full
/// [`crate::service::VerificationService`] pipeline performs.
///
/// Returns `Ok(true)`/`Ok(false)` for a resolvable agent with a well-formed
/// signature of the wrong or right value; propagates resolver errors (a
/// `NotFound` or `InactiveAgent` DID is not downgraded to a verdict here,
/// unlike the full service — this path makes no metadata promise to soften).
pub async fn quick_verify(
    resolver: &Resolver,
    message: &Message,
    cancel: &CancellationToken,
) -> Result<bool, VerifyError> {
    let did = message.agent_did();
    let algorithm_tag = inferred_algorithm_tag(did.chain());

    let key = resolver.resolve_public_key(&did.to_string(), cancel).await?;
    let public_key = PublicKey::decode(key.key_type(), key.public_key())?;

    let base = build_body_only_base(message);
    Ok(verify_signature(algorithm_tag, &public_key, base.as_bytes(), message.signature())?)
}
