//! Chain identifiers, configuration records and the chain registry.
//!
//! - [`ChainId`] - An EIP-155 numeric chain identifier (e.g., `1` for Ethereum)
//! - [`ChainConfig`] - Static display and network metadata for one chain
//! - [`ChainRegistry`] - Lookup of [`ChainConfig`] records by identifier

use serde::Serialize;
use std::collections::HashMap;
use std::fmt;

use crate::error::UnsupportedChainError;
use crate::networks::{MAINNET, SUPPORTED_CHAINS};

/// An EIP-155 chain ID (e.g., 1 for Ethereum, 137 for Polygon).
pub type ChainId = u64;

/// Formats a chain ID as a CAIP-2 identifier.
///
/// Example: `caip2(8453)` returns `"eip155:8453"`.
#[must_use]
pub fn caip2(chain_id: ChainId) -> String {
    format!("eip155:{chain_id}")
}

/// Parses a CAIP-2 identifier into an EIP-155 chain ID.
///
/// Returns `None` if the input is not a valid `eip155:` prefixed string.
#[must_use]
pub fn parse_caip2(caip: &str) -> Option<ChainId> {
    caip.strip_prefix("eip155:").and_then(|s| s.parse().ok())
}

/// Configuration record for a supported chain.
///
/// Records are defined at process start and never mutated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct ChainConfig {
    /// EIP-155 chain ID.
    pub id: ChainId,
    /// Human-readable display name (e.g., "Ethereum", "Polygon Amoy").
    pub name: &'static str,
    /// Short network slug (e.g., "mainnet", "sepolia").
    pub network: &'static str,
    /// Ticker of the native gas currency.
    pub native_currency: &'static str,
    /// Block explorer base URL.
    pub explorer_url: &'static str,
    /// Whether the chain is a test network.
    pub testnet: bool,
}

impl ChainConfig {
    /// Returns the CAIP-2 form of this chain's identifier.
    #[must_use]
    pub fn caip2(&self) -> String {
        caip2(self.id)
    }
}

impl fmt::Display for ChainConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.name, self.id)
    }
}

/// Registry of chain configurations indexed by chain ID.
///
/// Lookups never fall back to another chain: an identifier without an entry
/// fails with [`UnsupportedChainError`]. The default registry holds
/// [`SUPPORTED_CHAINS`].
#[derive(Debug, Clone)]
pub struct ChainRegistry(HashMap<ChainId, ChainConfig>);

impl ChainRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self(HashMap::new())
    }

    /// Creates a registry pre-populated from a chain slice.
    ///
    /// A later entry with the same identifier replaces an earlier one.
    #[must_use]
    pub fn from_chains(chains: &[ChainConfig]) -> Self {
        let mut registry = Self(HashMap::with_capacity(chains.len()));
        registry.register(chains);
        registry
    }

    /// Registers additional chains into this registry.
    pub fn register(&mut self, chains: &[ChainConfig]) {
        for chain in chains {
            self.0.insert(chain.id, *chain);
        }
    }

    /// Builder-style method: registers additional chains and returns `self`.
    #[must_use]
    pub fn with_chains(mut self, chains: &[ChainConfig]) -> Self {
        self.register(chains);
        self
    }

    /// Resolves the configuration for `chain_id`.
    ///
    /// # Errors
    ///
    /// Returns [`UnsupportedChainError`] if the chain has no registry entry.
    pub fn resolve(&self, chain_id: ChainId) -> Result<&ChainConfig, UnsupportedChainError> {
        self.0
            .get(&chain_id)
            .ok_or(UnsupportedChainError(chain_id))
    }

    /// Resolves `chain_id`, substituting [`MAINNET`] when it is absent.
    ///
    /// # Errors
    ///
    /// Returns [`UnsupportedChainError`] if the (substituted) chain has no entry.
    pub fn resolve_or_default(
        &self,
        chain_id: Option<ChainId>,
    ) -> Result<&ChainConfig, UnsupportedChainError> {
        self.resolve(chain_id.unwrap_or(MAINNET))
    }

    /// Looks up a chain by its network slug (e.g., `"sepolia"`).
    #[must_use]
    pub fn by_network_name(&self, network: &str) -> Option<&ChainConfig> {
        self.0.values().find(|c| c.network == network)
    }

    /// Returns `true` if the chain has a registry entry.
    #[must_use]
    pub fn contains(&self, chain_id: ChainId) -> bool {
        self.0.contains_key(&chain_id)
    }

    /// Iterates over all registered chains in no particular order.
    pub fn iter(&self) -> impl Iterator<Item = &ChainConfig> {
        self.0.values()
    }

    /// Returns the number of registered chains.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns `true` if no chains are registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl Default for ChainRegistry {
    fn default() -> Self {
        Self::from_chains(SUPPORTED_CHAINS)
    }
}
