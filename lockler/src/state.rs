//! Observed wallet connection state.
//!
//! The wallet side owns a [`ConnectionStore`] and publishes into it; views
//! hold a [`watch::Receiver`] obtained from [`ConnectionStore::subscribe`] and
//! only ever read.

use alloy_primitives::Address;
use serde::{Deserialize, Serialize};
use tokio::sync::watch;

use crate::chain::ChainId;

/// Snapshot of the live wallet connection.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConnectionState {
    /// Connected account, if any.
    pub address: Option<Address>,
    /// Chain the wallet is attached to, if known.
    pub chain_id: Option<ChainId>,
    /// Whether the wallet reports an active connection.
    pub is_connected: bool,
}

impl ConnectionState {
    /// State of a wallet connected with `address` on `chain_id`.
    #[must_use]
    pub const fn connected(address: Address, chain_id: ChainId) -> Self {
        Self {
            address: Some(address),
            chain_id: Some(chain_id),
            is_connected: true,
        }
    }
}

/// Reactive store of the current [`ConnectionState`].
///
/// Cloning yields another handle to the same store.
#[derive(Debug, Clone)]
pub struct ConnectionStore {
    sender: watch::Sender<ConnectionState>,
}

impl ConnectionStore {
    /// Creates a store holding a disconnected state.
    #[must_use]
    pub fn new() -> Self {
        Self::with_state(ConnectionState::default())
    }

    /// Creates a store holding `state`.
    #[must_use]
    pub fn with_state(state: ConnectionState) -> Self {
        let (sender, _) = watch::channel(state);
        Self { sender }
    }

    /// Returns a copy of the current state.
    #[must_use]
    pub fn snapshot(&self) -> ConnectionState {
        *self.sender.borrow()
    }

    /// Returns a receiver that observes every future update.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<ConnectionState> {
        self.sender.subscribe()
    }

    /// Replaces the current state, notifying subscribers if it changed.
    pub fn publish(&self, state: ConnectionState) {
        let changed = self.sender.send_if_modified(|current| {
            if *current == state {
                false
            } else {
                *current = state;
                true
            }
        });
        if changed {
            #[cfg(feature = "telemetry")]
            tracing::debug!(address = ?state.address, chain_id = ?state.chain_id, connected = state.is_connected, "Connection state updated");
        }
    }

    /// Clears the account while keeping the last known chain.
    pub fn disconnect(&self) {
        let chain_id = self.snapshot().chain_id;
        self.publish(ConnectionState {
            address: None,
            chain_id,
            is_connected: false,
        });
    }
}

impl Default for ConnectionStore {
    fn default() -> Self {
        Self::new()
    }
}
