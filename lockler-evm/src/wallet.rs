//! EVM wallet session and EIP-1193 injected connector.
//!
//! - [`EvmWalletSession`] - application session bound to the chain of a resolved provider
//! - [`Eip1193Connector`] - `eth_requestAccounts` handshake against a wallet RPC endpoint
//!
//! The connector is the only writer of the [`ConnectionStore`] it is given.

use alloy_primitives::Address;
use alloy_provider::{Provider, RootProvider};
use alloy_transport::TransportError;
use async_trait::async_trait;
use lockler::chain::{ChainConfig, ChainId};
use lockler::connector::{InjectedConnector, WalletSession};
use lockler::error::ConnectError;
use lockler::state::{ConnectionState, ConnectionStore};
use serde_json::{Value, json};
use tokio::sync::Mutex;
use url::Url;

use crate::provider::network_error;

/// EIP-1193 error code for a request the user rejected.
pub const USER_REJECTED_REQUEST: i64 = 4001;

/// EIP-1193 error code for a request the wallet has not authorized.
pub const UNAUTHORIZED: i64 = 4100;

/// EIP-3326 error code for a chain the wallet does not know.
pub const UNRECOGNIZED_CHAIN: i64 = 4902;

/// Application session bound to one EVM chain.
///
/// Opening the session checks that the provider still serves the requested
/// chain and records it as the active chain.
#[derive(Debug, Default)]
pub struct EvmWalletSession {
    active_chain: Mutex<Option<ChainId>>,
}

impl EvmWalletSession {
    /// Creates a closed session.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the chain of the open session, if any.
    pub async fn active_chain(&self) -> Option<ChainId> {
        *self.active_chain.lock().await
    }
}

#[async_trait]
impl WalletSession<RootProvider> for EvmWalletSession {
    async fn connect_wallet(
        &self,
        chain: &ChainConfig,
        provider: &RootProvider,
    ) -> Result<(), ConnectError> {
        let reported = provider
            .get_chain_id()
            .await
            .map_err(|err| network_error(chain.id, &err))?;
        if reported != chain.id {
            return Err(ConnectError::rejected(format!(
                "Session requested on {chain} but the network is on chain {reported}"
            )));
        }
        *self.active_chain.lock().await = Some(chain.id);
        #[cfg(feature = "telemetry")]
        tracing::debug!(chain = %chain, "Wallet session opened");
        Ok(())
    }

    async fn disconnect(&self) {
        self.active_chain.lock().await.take();
        #[cfg(feature = "telemetry")]
        tracing::debug!("Wallet session closed");
    }
}

/// Injected-wallet connector speaking EIP-1193 over JSON-RPC.
///
/// The handshake asks for accounts with `eth_requestAccounts`, switches the
/// wallet to the requested chain with `wallet_switchEthereumChain` when it is
/// on another one, and publishes the first granted account.
#[derive(Debug, Clone)]
pub struct Eip1193Connector {
    wallet: RootProvider,
    store: ConnectionStore,
}

impl Eip1193Connector {
    /// Creates a connector for the wallet at `wallet_url` that publishes into `store`.
    #[must_use]
    pub fn new(wallet_url: Url, store: ConnectionStore) -> Self {
        Self {
            wallet: RootProvider::new_http(wallet_url),
            store,
        }
    }

    /// Returns the store this connector publishes into.
    #[must_use]
    pub const fn store(&self) -> &ConnectionStore {
        &self.store
    }

    async fn request_accounts(&self) -> Result<Vec<Address>, ConnectError> {
        self.wallet
            .client()
            .request_noparams("eth_requestAccounts")
            .await
            .map_err(|err| wallet_error(&err))
    }

    async fn ensure_chain(&self, chain: &ChainConfig) -> Result<(), ConnectError> {
        let current = self
            .wallet
            .get_chain_id()
            .await
            .map_err(|err| wallet_error(&err))?;
        if current == chain.id {
            return Ok(());
        }
        #[cfg(feature = "telemetry")]
        tracing::info!(from = current, to = chain.id, "Switching wallet chain");
        let params = [json!({ "chainId": format!("{:#x}", chain.id) })];
        let _: Value = self
            .wallet
            .client()
            .request("wallet_switchEthereumChain", params)
            .await
            .map_err(|err| wallet_error(&err))?;
        Ok(())
    }
}

#[async_trait]
impl InjectedConnector for Eip1193Connector {
    #[cfg_attr(
        feature = "telemetry",
        tracing::instrument(name = "lockler.handshake", skip_all, fields(chain_id = chain.id), err)
    )]
    async fn handshake(&self, chain: &ChainConfig) -> Result<(), ConnectError> {
        let accounts = self.request_accounts().await?;
        let address = accounts
            .first()
            .copied()
            .ok_or_else(|| ConnectError::rejected("Wallet granted no accounts"))?;
        self.ensure_chain(chain).await?;
        self.store
            .publish(ConnectionState::connected(address, chain.id));
        Ok(())
    }
}

/// Maps a wallet RPC failure to a [`ConnectError`].
///
/// Error responses come from the wallet itself (the user declined, the chain
/// is unknown, ...) and count as rejections. Anything else means the wallet
/// could not be reached.
fn wallet_error(err: &TransportError) -> ConnectError {
    match err.as_error_resp() {
        Some(payload) if payload.code == USER_REJECTED_REQUEST => {
            ConnectError::rejected(format!("User rejected the request: {}", payload.message))
        }
        Some(payload) if payload.code == UNAUTHORIZED => {
            ConnectError::rejected(format!("Wallet has not authorized Lockler: {}", payload.message))
        }
        Some(payload) if payload.code == UNRECOGNIZED_CHAIN => {
            ConnectError::rejected(format!("Wallet does not know this chain: {}", payload.message))
        }
        Some(payload) => ConnectError::rejected(payload.message.to_string()),
        None => ConnectError::unavailable(format!("Wallet is unreachable: {err}")),
    }
}
