//! Read-only EVM provider resolution.
//!
//! [`EvmProviderResolver`] turns a chain ID into an alloy [`RootProvider`]
//! backed by every HTTP endpoint configured for that chain. Each endpoint sits
//! behind an optional rate limit ([`ThrottleLayer`]) and all of them behind a
//! [`FallbackLayer`], so one dead endpoint does not make the chain unavailable.
//!
//! A freshly built provider is probed with `eth_chainId` before it is handed
//! out. Only probed providers are cached; a failed resolution leaves nothing
//! behind.

use std::collections::HashMap;
use std::num::NonZeroUsize;

use alloy_provider::{Provider, RootProvider};
use alloy_rpc_client::RpcClient;
use alloy_transport::TransportError;
use alloy_transport::layers::{FallbackLayer, ThrottleLayer};
use alloy_transport_http::Http;
use async_trait::async_trait;
use dashmap::DashMap;
use lockler::chain::ChainId;
use lockler::connector::ProviderResolver;
use lockler::error::{ConnectError, UnsupportedChainError};
use serde::{Deserialize, Serialize};
use tower::ServiceBuilder;
use url::Url;

/// An RPC endpoint with an optional requests-per-second limit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RpcEndpoint {
    /// HTTP(S) JSON-RPC URL.
    pub url: Url,
    /// Maximum requests per second, unlimited if `None`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rate_limit: Option<u32>,
}

impl RpcEndpoint {
    /// Creates an endpoint without a rate limit.
    #[must_use]
    pub const fn new(url: Url) -> Self {
        Self {
            url,
            rate_limit: None,
        }
    }

    /// Sets the rate limit.
    #[must_use]
    pub fn with_rate_limit(mut self, rate_limit: u32) -> Self {
        self.rate_limit = Some(rate_limit);
        self
    }

    fn is_http(&self) -> bool {
        matches!(self.url.scheme(), "http" | "https")
    }
}

/// Resolves [`RootProvider`]s from per-chain endpoint lists.
#[derive(Debug, Default)]
pub struct EvmProviderResolver {
    endpoints: HashMap<ChainId, Vec<RpcEndpoint>>,
    providers: DashMap<ChainId, RootProvider>,
}

impl EvmProviderResolver {
    /// Creates a resolver with no configured chains.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds endpoints for `chain_id`, keeping previously added ones.
    pub fn add_endpoints(
        &mut self,
        chain_id: ChainId,
        endpoints: impl IntoIterator<Item = RpcEndpoint>,
    ) {
        self.endpoints.entry(chain_id).or_default().extend(endpoints);
        self.providers.remove(&chain_id);
    }

    /// Builder-style method: adds endpoints for `chain_id` and returns `self`.
    #[must_use]
    pub fn with_endpoints(
        mut self,
        chain_id: ChainId,
        endpoints: impl IntoIterator<Item = RpcEndpoint>,
    ) -> Self {
        self.add_endpoints(chain_id, endpoints);
        self
    }

    /// Returns the chains that have at least one endpoint.
    pub fn chains(&self) -> impl Iterator<Item = ChainId> + '_ {
        self.endpoints
            .iter()
            .filter(|(_, endpoints)| !endpoints.is_empty())
            .map(|(chain_id, _)| *chain_id)
    }

    /// Creates an RPC client over the HTTP(S) endpoints in `endpoints`.
    ///
    /// Non-HTTP(S) URLs are skipped. Returns `None` if no endpoint remains.
    #[allow(unused_variables)] // chain_id is needed for tracing only
    #[must_use]
    pub fn rpc_client(chain_id: ChainId, endpoints: &[RpcEndpoint]) -> Option<RpcClient> {
        let transports = endpoints
            .iter()
            .filter(|endpoint| endpoint.is_http())
            .map(|endpoint| {
                #[cfg(feature = "telemetry")]
                tracing::info!(chain_id, rpc_url = %endpoint.url, rate_limit = ?endpoint.rate_limit, "Using HTTP transport");
                ServiceBuilder::new()
                    .layer(ThrottleLayer::new(endpoint.rate_limit.unwrap_or(u32::MAX)))
                    .service(Http::new(endpoint.url.clone()))
            })
            .collect::<Vec<_>>();
        let count = NonZeroUsize::new(transports.len())?;
        let fallback = ServiceBuilder::new()
            .layer(FallbackLayer::default().with_active_transport_count(count))
            .service(transports);
        Some(RpcClient::new(fallback, false))
    }

    async fn build(&self, chain_id: ChainId) -> Result<RootProvider, ConnectError> {
        let endpoints = self
            .endpoints
            .get(&chain_id)
            .filter(|endpoints| !endpoints.is_empty())
            .ok_or(UnsupportedChainError(chain_id))?;
        let client = Self::rpc_client(chain_id, endpoints).ok_or_else(|| {
            ConnectError::unavailable(format!("No HTTP endpoint configured for chain {chain_id}"))
        })?;
        let provider: RootProvider = RootProvider::new(client);

        let reported = provider
            .get_chain_id()
            .await
            .map_err(|err| network_error(chain_id, &err))?;
        if reported != chain_id {
            return Err(ConnectError::unavailable(format!(
                "RPC endpoint for chain {chain_id} serves chain {reported}"
            )));
        }
        Ok(provider)
    }
}

#[async_trait]
impl ProviderResolver for EvmProviderResolver {
    type Provider = RootProvider;

    #[cfg_attr(
        feature = "telemetry",
        tracing::instrument(name = "lockler.get_provider", skip(self), err)
    )]
    async fn get_provider(&self, chain_id: ChainId) -> Result<RootProvider, ConnectError> {
        let cached = self.providers.get(&chain_id).map(|p| p.value().clone());
        if let Some(provider) = cached {
            return Ok(provider);
        }
        let provider = self.build(chain_id).await?;
        self.providers.insert(chain_id, provider.clone());
        Ok(provider)
    }
}

/// Maps a transport failure of a read provider to [`ConnectError::NetworkUnavailable`].
pub(crate) fn network_error(chain_id: ChainId, err: &TransportError) -> ConnectError {
    ConnectError::unavailable(format!("Chain {chain_id} is unavailable: {err}"))
}
