//! RFC-9421 HTTP message signature base canonicalization.
//!
//! This crate is pure: given an [`SignatureBaseRequest`] and a
//! [`SignatureInputParams`], [`build_signature_base`] deterministically
//! produces the exact byte string a signer hashes and signs, and a verifier
//! reconstructs to check a signature against. It performs no cryptography
//! and no I/O — see [`sage-crypto`](https://docs.rs/sage-crypto) for
//! signature dispatch over this base.
//!
//! # Example
//!
//! ```
//! use sage_canon::{build_signature_base, CoveredComponent, SignatureInputParams, SignatureParams, SignatureBaseRequest};
//!
//! let req = SignatureBaseRequest::new("GET", "https://example.com/foo?bar=baz");
//! let input = SignatureInputParams {
//!     components: vec![
//!         CoveredComponent::method(),
//!         CoveredComponent::authority(),
//!         CoveredComponent::path(),
//!         CoveredComponent::query(),
//!     ],
//!     params: SignatureParams {
//!         keyid: Some("test-key".to_string()),
//!         alg: Some("ed25519".to_string()),
//!         created: Some(1719234000),
//!         ..Default::default()
//!     },
//! };
//! let base = build_signature_base(&req, &input).unwrap();
//! assert!(base.starts_with("\"@method\": GET\n"));
//! ```

mod base;
mod error;
mod params;
mod request;

pub use base::build_signature_base;
pub use error::CanonError;
pub use params::{CoveredComponent, SignatureInputParams, SignatureParams};
pub use request::{Headers, SignatureBaseRequest};
