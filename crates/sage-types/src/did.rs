//! SAGE decentralized identifiers.
//!
//! A DID names an agent: `did:sage:<chain>:<address>[:<nonce>]`. Parsing
//! accepts both long (`ethereum`, `solana`) and short (`eth`, `sol`) chain
//! tokens; [`Did::to_string`] always emits the long form and a lowercase
//! address, so `parse(serialize(did)) == did` holds for every legal DID
//! (property 6 of the trust kernel's testable invariants).

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::DidError;

/// The blockchain namespace a DID's address is native to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Chain {
    /// Ethereum and EVM-compatible chains using 20-byte hex addresses.
    Ethereum,
    /// Solana, using Base58-encoded Ed25519 public keys as addresses.
    Solana,
}

impl Chain {
    /// Parses a chain token, accepting both the long and short forms.
    fn parse(token: &str) -> Result<Self, DidError> {
        match token {
            "ethereum" | "eth" => Ok(Chain::Ethereum),
            "solana" | "sol" => Ok(Chain::Solana),
            other => Err(DidError::UnknownChain(other.to_string())),
        }
    }

    /// The canonical long-form token emitted by [`Did::to_string`].
    fn long_name(self) -> &'static str {
        match self {
            Chain::Ethereum => "ethereum",
            Chain::Solana => "solana",
        }
    }
}

impl fmt::Display for Chain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.long_name())
    }
}

/// A `did:sage:...` decentralized identifier.
///
/// Equality and hashing are derived from the normalized form: two DIDs
/// constructed from differently-cased Ethereum addresses or differing
/// short/long chain tokens compare equal iff their normalized forms match.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Did {
    chain: Chain,
    /// Chain-native address, already normalized (lowercase hex for
    /// Ethereum; Base58 is case-sensitive and kept as supplied).
    address: String,
    nonce: Option<u64>,
}

impl Did {
    /// Constructs a DID from already-validated parts, normalizing the address.
    ///
    /// Returns an error if `address` is not well-formed for `chain`.
    pub fn new(chain: Chain, address: &str, nonce: Option<u64>) -> Result<Self, DidError> {
        let address = normalize_address(chain, address)?;
        Ok(Did {
            chain,
            address,
            nonce,
        })
    }

    /// The DID's chain.
    pub fn chain(&self) -> Chain {
        self.chain
    }

    /// The normalized chain-native address (lowercase hex for Ethereum).
    pub fn address(&self) -> &str {
        &self.address
    }

    /// The optional disambiguating nonce.
    pub fn nonce(&self) -> Option<u64> {
        self.nonce
    }
}

/// Validates and normalizes a chain-native address, independent of any
/// particular DID. Shared by [`Did::new`] and
/// [`crate::agent::AgentMetadata::new`]'s owner-address invariant
/// (spec.md §3: "owner is a valid chain address").
pub(crate) fn normalize_address(chain: Chain, address: &str) -> Result<String, DidError> {
    match chain {
        Chain::Ethereum => {
            let stripped = address
                .strip_prefix("0x")
                .or_else(|| address.strip_prefix("0X"))
                .ok_or_else(|| invalid_eth(address))?;
            if stripped.len() != 40 || !stripped.chars().all(|c| c.is_ascii_hexdigit()) {
                return Err(invalid_eth(address));
            }
            Ok(format!("0x{}", stripped.to_ascii_lowercase()))
        }
        Chain::Solana => {
            let decoded = bs58::decode(address)
                .into_vec()
                .map_err(|_| invalid_sol(address))?;
            if decoded.len() != 32 {
                return Err(invalid_sol(address));
            }
            Ok(address.to_string())
        }
    }
}

fn invalid_eth(address: &str) -> DidError {
    DidError::InvalidAddress {
        chain: "ethereum",
        address: address.to_string(),
    }
}

fn invalid_sol(address: &str) -> DidError {
    DidError::InvalidAddress {
        chain: "solana",
        address: address.to_string(),
    }
}

impl fmt::Display for Did {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "did:sage:{}:{}", self.chain, self.address)?;
        if let Some(nonce) = self.nonce {
            write!(f, ":{nonce}")?;
        }
        Ok(())
    }
}

impl FromStr for Did {
    type Err = DidError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut parts = s.split(':');
        let scheme = parts.next().unwrap_or_default();
        let method = parts.next().unwrap_or_default();
        if scheme != "did" || method != "sage" {
            return Err(DidError::InvalidFormat(s.to_string()));
        }
        let chain_token = parts
            .next()
            .ok_or_else(|| DidError::InvalidFormat(s.to_string()))?;
        let address = parts
            .next()
            .ok_or_else(|| DidError::InvalidFormat(s.to_string()))?;
        let chain = Chain::parse(chain_token)?;
        let nonce = match parts.next() {
            None => None,
            Some(n) => Some(
                n.parse::<u64>()
                    .map_err(|_| DidError::InvalidNonce(n.to_string()))?,
            ),
        };
        if parts.next().is_some() {
            return Err(DidError::InvalidFormat(s.to_string()));
        }
        Did::new(chain, address, nonce)
    }
}

impl Serialize for Did {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for Did {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Did::from_str(&s).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn s6_did_parse_ethereum_with_nonce() {
        let did: Did = "did:sage:ethereum:0xABCD000000000000000000000000000000001234:5"
            .parse()
            .unwrap();
        assert_eq!(did.chain(), Chain::Ethereum);
        assert_eq!(
            did.address(),
            "0xabcd000000000000000000000000000000001234"
        );
        assert_eq!(did.nonce(), Some(5));
    }

    #[test]
    fn s6_did_parse_missing_parts_fails() {
        assert!("did:sage".parse::<Did>().is_err());
    }

    #[test]
    fn s6_did_parse_unknown_chain_fails() {
        assert!("did:sage:unknown:x".parse::<Did>().is_err());
    }

    #[test]
    fn accepts_short_chain_tokens() {
        let did: Did = "did:sage:eth:0x0000000000000000000000000000000000000001"
            .parse()
            .unwrap();
        assert_eq!(did.chain(), Chain::Ethereum);

        let sol_addr = bs58::encode([7u8; 32]).into_string();
        let did: Did = format!("did:sage:sol:{sol_addr}").parse().unwrap();
        assert_eq!(did.chain(), Chain::Solana);
    }

    #[test]
    fn property_6_roundtrip_through_display_and_parse() {
        let sol_addr = bs58::encode([3u8; 32]).into_string();
        for text in [
            "did:sage:ethereum:0xabcd000000000000000000000000000000001234".to_string(),
            "did:sage:ethereum:0xabcd000000000000000000000000000000001234:7".to_string(),
            format!("did:sage:solana:{sol_addr}"),
        ] {
            let did: Did = text.parse().unwrap();
            let serialized = did.to_string();
            let reparsed: Did = serialized.parse().unwrap();
            assert_eq!(did, reparsed);
        }
    }

    #[test]
    fn canonical_emission_always_long_form_and_lowercase() {
        let did: Did = "did:sage:eth:0xABCD000000000000000000000000000000001234"
            .parse()
            .unwrap();
        assert_eq!(
            did.to_string(),
            "did:sage:ethereum:0xabcd000000000000000000000000000000001234"
        );
    }

    #[test]
    fn rejects_malformed_ethereum_address() {
        assert!(Did::new(Chain::Ethereum, "0xnothex", None).is_err());
        assert!(Did::new(Chain::Ethereum, "not-prefixed", None).is_err());
    }

    #[test]
    fn rejects_malformed_solana_address() {
        assert!(Did::new(Chain::Solana, "not-base58-!!!", None).is_err());
    }

    #[test]
    fn serde_roundtrip() {
        let did: Did = "did:sage:ethereum:0xabcd000000000000000000000000000000001234:1"
            .parse()
            .unwrap();
        let json = serde_json::to_string(&did).unwrap();
        let back: Did = serde_json::from_str(&json).unwrap();
        assert_eq!(did, back);
    }
}
