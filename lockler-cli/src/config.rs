//! Lockler CLI configuration.
//!
//! Loads configuration from a TOML file with support for environment variable
//! expansion in string values. Variables use `$VAR` or `${VAR}` syntax.
//!
//! # Example Configuration
//!
//! ```toml
//! default_chain = 1
//!
//! [chains."eip155:1"]
//! rpc_urls = ["https://eth.llamarpc.com", "$BACKUP_RPC_URL"]
//! rate_limit = 25
//!
//! [wallet]
//! rpc_url = "http://127.0.0.1:8545"
//!
//! [lock]
//! erc721 = "0x0000000000000000000000000000000000000000"
//! ```
//!
//! # Environment Variables
//!
//! - `CONFIG` - Path to configuration file (default: `lockler.toml`)
//! - `WALLET_RPC_URL` - Override the wallet endpoint
//! - Any variable referenced by `$VAR` in the config file

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use alloy_primitives::Address;
use lockler::chain::{ChainId, parse_caip2};
use lockler::networks::MAINNET;
use lockler_evm::RpcEndpoint;
use serde::{Deserialize, Serialize};
use url::Url;

/// Errors raised while loading the configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// The file exists but could not be read.
    #[error("cannot read {path}: {source}")]
    Read {
        /// Path of the configuration file.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// The file is not valid configuration TOML.
    #[error("invalid configuration: {0}")]
    Parse(#[from] toml::de::Error),

    /// `WALLET_RPC_URL` is not a URL.
    #[error("invalid WALLET_RPC_URL: {0}")]
    WalletUrl(#[from] url::ParseError),
}

/// Top-level CLI configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LocklerConfig {
    /// Chain used when neither the command line nor the wallet names one (default: mainnet).
    #[serde(default = "default_chain")]
    pub default_chain: ChainId,

    /// RPC endpoints keyed by CAIP-2 chain identifier.
    #[serde(default)]
    pub chains: HashMap<String, ChainEndpoints>,

    /// Wallet endpoint.
    #[serde(default)]
    pub wallet: WalletConfig,

    /// Optional lock contract to query after connecting.
    #[serde(default)]
    pub lock: Option<LockConfig>,
}

/// RPC endpoints for one chain.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChainEndpoints {
    /// HTTP(S) JSON-RPC URLs, tried with fallback.
    pub rpc_urls: Vec<String>,

    /// Requests-per-second limit applied to each URL.
    #[serde(default)]
    pub rate_limit: Option<u32>,
}

/// EIP-1193 wallet endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WalletConfig {
    /// JSON-RPC URL that answers `eth_requestAccounts`.
    #[serde(default = "default_wallet_url")]
    pub rpc_url: Url,
}

/// ERC-721 lock contract.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct LockConfig {
    /// Contract address.
    pub erc721: Address,
}

const fn default_chain() -> ChainId {
    MAINNET
}

fn default_wallet_url() -> Url {
    Url::parse("http://127.0.0.1:8545").expect("static wallet URL is valid")
}

impl Default for WalletConfig {
    fn default() -> Self {
        Self {
            rpc_url: default_wallet_url(),
        }
    }
}

impl Default for LocklerConfig {
    fn default() -> Self {
        Self {
            default_chain: default_chain(),
            chains: HashMap::new(),
            wallet: WalletConfig::default(),
            lock: None,
        }
    }
}

impl LocklerConfig {
    /// Loads configuration from `path`. A missing file yields the defaults.
    ///
    /// After loading, `$VAR` / `${VAR}` references are expanded from the
    /// process environment and `WALLET_RPC_URL` overrides the wallet endpoint.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let content = if path.exists() {
            std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
                path: path.to_owned(),
                source,
            })?
        } else {
            tracing::debug!(path = %path.display(), "No configuration file, using defaults");
            String::new()
        };

        let mut config = Self::from_toml_str(&content)?;

        if let Ok(url) = std::env::var("WALLET_RPC_URL") {
            config.wallet.rpc_url = url.parse()?;
        }

        Ok(config)
    }

    /// Parses configuration text after expanding environment variables.
    ///
    /// # Errors
    ///
    /// Returns an error if the text is not valid configuration TOML.
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let expanded = expand_env_vars(content);
        Ok(toml::from_str(&expanded)?)
    }

    /// Returns the RPC endpoints per chain.
    ///
    /// Chains with an invalid CAIP-2 key and URLs that do not parse (for
    /// example an unresolved `$VAR`) are skipped with a warning.
    #[must_use]
    pub fn endpoints(&self) -> Vec<(ChainId, Vec<RpcEndpoint>)> {
        let mut result = Vec::with_capacity(self.chains.len());
        for (network, chain) in &self.chains {
            let Some(chain_id) = parse_caip2(network) else {
                tracing::warn!(network = %network, "Skipping chain: invalid CAIP-2 identifier");
                continue;
            };
            let endpoints = chain
                .rpc_urls
                .iter()
                .filter_map(|raw| match raw.parse::<Url>() {
                    Ok(url) => Some(RpcEndpoint {
                        url,
                        rate_limit: chain.rate_limit,
                    }),
                    Err(e) => {
                        tracing::warn!(network = %network, rpc_url = %raw, "Skipping RPC URL: {e}");
                        None
                    }
                })
                .collect::<Vec<_>>();
            result.push((chain_id, endpoints));
        }
        result
    }
}

/// Expands `$VAR` and `${VAR}` patterns in a string from environment variables.
///
/// Unresolved variables are left as-is.
fn expand_env_vars(input: &str) -> String {
    let mut result = String::with_capacity(input.len());
    let mut chars = input.chars().peekable();

    while let Some(ch) = chars.next() {
        if ch != '$' {
            result.push(ch);
            continue;
        }
        let braced = chars.next_if_eq(&'{').is_some();

        let mut var_name = String::new();
        let mut closed = false;
        while let Some(&c) = chars.peek() {
            if braced && c == '}' {
                chars.next();
                closed = true;
                break;
            }
            if !braced && !c.is_ascii_alphanumeric() && c != '_' {
                break;
            }
            var_name.push(c);
            chars.next();
        }

        match std::env::var(&var_name) {
            Ok(val) if !var_name.is_empty() => result.push_str(&val),
            _ => {
                result.push('$');
                if braced {
                    result.push('{');
                }
                result.push_str(&var_name);
                if closed {
                    result.push('}');
                }
            }
        }
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_config_uses_defaults() {
        let config = LocklerConfig::from_toml_str("").unwrap();
        assert_eq!(config.default_chain, MAINNET);
        assert!(config.chains.is_empty());
        assert!(config.lock.is_none());
        assert_eq!(config.wallet.rpc_url.as_str(), "http://127.0.0.1:8545/");
    }

    #[test]
    fn test_parse_full_config() {
        let config = LocklerConfig::from_toml_str(
            r#"
            default_chain = 137

            [chains."eip155:137"]
            rpc_urls = ["https://polygon.example", "https://backup.example"]
            rate_limit = 10

            [wallet]
            rpc_url = "http://wallet.local:8545"

            [lock]
            erc721 = "0x00000000000000000000000000000000000000f7"
            "#,
        )
        .unwrap();

        assert_eq!(config.default_chain, 137);
        assert!(config.lock.is_some());
        let endpoints = config.endpoints();
        assert_eq!(endpoints.len(), 1);
        let (chain_id, urls) = &endpoints[0];
        assert_eq!(*chain_id, 137);
        assert_eq!(urls.len(), 2);
        assert!(urls.iter().all(|e| e.rate_limit == Some(10)));
    }

    #[test]
    fn test_invalid_chain_keys_and_urls_are_skipped() {
        let config = LocklerConfig::from_toml_str(
            r#"
            [chains."polygon"]
            rpc_urls = ["https://polygon.example"]

            [chains."eip155:1"]
            rpc_urls = ["$LOCKLER_TEST_UNSET_RPC", "https://eth.example"]
            "#,
        )
        .unwrap();

        let endpoints = config.endpoints();
        assert_eq!(endpoints.len(), 1);
        assert_eq!(endpoints[0].0, 1);
        assert_eq!(endpoints[0].1.len(), 1);
    }

    #[test]
    fn test_missing_file_yields_defaults() {
        let config = LocklerConfig::load_from(Path::new("/nonexistent/lockler.toml")).unwrap();
        assert_eq!(config.default_chain, MAINNET);
    }

    #[test]
    fn test_invalid_toml_is_error() {
        let err = LocklerConfig::from_toml_str("default_chain = \"one\"").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn test_expand_env_vars() {
        let home = std::env::var("PATH").unwrap();
        assert_eq!(expand_env_vars("a=$PATH;"), format!("a={home};"));
        assert_eq!(expand_env_vars("a=${PATH}"), format!("a={home}"));
        assert_eq!(
            expand_env_vars("x=${LOCKLER_TEST_UNSET} $LOCKLER_TEST_UNSET"),
            "x=${LOCKLER_TEST_UNSET} $LOCKLER_TEST_UNSET"
        );
        assert_eq!(expand_env_vars("cost: $5"), "cost: $5");
        assert_eq!(expand_env_vars("lone $"), "lone $");
    }
}
