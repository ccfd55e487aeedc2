//! Wallet connection pipeline.
//!
//! A connect attempt runs four steps in order and stops at the first failure:
//!
//! 1. resolve the [`ChainConfig`] from the [`ChainRegistry`]
//! 2. resolve a read-only provider through a [`ProviderResolver`]
//! 3. open the application session through a [`WalletSession`]
//! 4. run the injected-wallet handshake through an [`InjectedConnector`]
//!
//! Steps 3 and 4 belong to different collaborators. If the handshake fails
//! after the session was opened, the session is closed again so no partial
//! connection survives a failed attempt.
//!
//! [`WalletConnector`] admits one attempt at a time; a call made while an
//! attempt is pending returns [`ConnectOutcome::AlreadyPending`] without
//! touching any collaborator.

use std::fmt::{self, Debug};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;

use crate::chain::{ChainConfig, ChainId, ChainRegistry};
use crate::error::ConnectError;

/// Produces read-only provider handles for a chain.
///
/// Implementations must not leave any state behind when they fail.
#[async_trait]
pub trait ProviderResolver: Send + Sync {
    /// Handle used for read calls against the chain.
    type Provider: Send + Sync;

    /// Returns a provider for `chain_id`.
    ///
    /// # Errors
    ///
    /// [`ConnectError::UnsupportedChain`] if no endpoint is configured for the
    /// chain, [`ConnectError::NetworkUnavailable`] if none is reachable.
    async fn get_provider(&self, chain_id: ChainId) -> Result<Self::Provider, ConnectError>;
}

/// Application-level wallet session tied to one chain.
#[async_trait]
pub trait WalletSession<P: Send + Sync>: Send + Sync {
    /// Opens the session on `chain` using `provider`.
    ///
    /// # Errors
    ///
    /// Returns [`ConnectError`] if the session cannot be established.
    async fn connect_wallet(&self, chain: &ChainConfig, provider: &P) -> Result<(), ConnectError>;

    /// Closes a session opened by [`connect_wallet`](Self::connect_wallet).
    async fn disconnect(&self) {}
}

/// Injected-wallet handshake (the permission prompt of an EIP-1193 wallet).
///
/// On success the implementation publishes the granted account to the
/// connection store it owns.
#[async_trait]
pub trait InjectedConnector: Send + Sync {
    /// Requests wallet access for `chain`.
    ///
    /// # Errors
    ///
    /// Returns [`ConnectError::ConnectionRejected`] if the user or wallet
    /// refuses, [`ConnectError::NetworkUnavailable`] if the wallet is unreachable.
    async fn handshake(&self, chain: &ChainConfig) -> Result<(), ConnectError>;
}

#[async_trait]
impl<T: ProviderResolver + ?Sized> ProviderResolver for Arc<T> {
    type Provider = T::Provider;

    async fn get_provider(&self, chain_id: ChainId) -> Result<Self::Provider, ConnectError> {
        (**self).get_provider(chain_id).await
    }
}

#[async_trait]
impl<P: Send + Sync, T: WalletSession<P> + ?Sized> WalletSession<P> for Arc<T> {
    async fn connect_wallet(&self, chain: &ChainConfig, provider: &P) -> Result<(), ConnectError> {
        (**self).connect_wallet(chain, provider).await
    }

    async fn disconnect(&self) {
        (**self).disconnect().await;
    }
}

#[async_trait]
impl<T: InjectedConnector + ?Sized> InjectedConnector for Arc<T> {
    async fn handshake(&self, chain: &ChainConfig) -> Result<(), ConnectError> {
        (**self).handshake(chain).await
    }
}

/// Result of a [`WalletConnector::connect`] call that did not fail.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectOutcome {
    /// All four steps succeeded; the wallet will publish its state.
    Connected,
    /// Another attempt was still running; nothing was done.
    AlreadyPending,
}

/// Runs connect attempts against a registry and three collaborators.
pub struct WalletConnector<R, S, I> {
    registry: ChainRegistry,
    resolver: R,
    session: S,
    injected: I,
    in_flight: AtomicBool,
}

impl<R, S, I> Debug for WalletConnector<R, S, I> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WalletConnector")
            .field("chains", &self.registry.len())
            .field("in_flight", &self.in_flight.load(Ordering::Relaxed))
            .finish_non_exhaustive()
    }
}

impl<R, S, I> WalletConnector<R, S, I>
where
    R: ProviderResolver,
    S: WalletSession<R::Provider>,
    I: InjectedConnector,
{
    /// Creates a connector.
    pub const fn new(registry: ChainRegistry, resolver: R, session: S, injected: I) -> Self {
        Self {
            registry,
            resolver,
            session,
            injected,
            in_flight: AtomicBool::new(false),
        }
    }

    /// Returns the chain registry used for step 1.
    pub const fn registry(&self) -> &ChainRegistry {
        &self.registry
    }

    /// Returns `true` while an attempt is running.
    pub fn is_pending(&self) -> bool {
        self.in_flight.load(Ordering::Acquire)
    }

    /// Runs one connect attempt for `chain_id`.
    ///
    /// # Errors
    ///
    /// Returns the [`ConnectError`] of the first failing step.
    #[cfg_attr(
        feature = "telemetry",
        tracing::instrument(name = "lockler.connect", skip(self), err)
    )]
    pub async fn connect(&self, chain_id: ChainId) -> Result<ConnectOutcome, ConnectError> {
        let Some(_guard) = InFlightGuard::acquire(&self.in_flight) else {
            #[cfg(feature = "telemetry")]
            tracing::debug!(chain_id, "Connect attempt already pending");
            return Ok(ConnectOutcome::AlreadyPending);
        };

        let chain = self.registry.resolve(chain_id)?;
        let provider = self.resolver.get_provider(chain.id).await?;
        self.session.connect_wallet(chain, &provider).await?;
        if let Err(err) = self.injected.handshake(chain).await {
            self.session.disconnect().await;
            return Err(err);
        }

        #[cfg(feature = "telemetry")]
        tracing::info!(chain = %chain, "Wallet connected");
        Ok(ConnectOutcome::Connected)
    }
}

/// Holds the in-flight flag for the duration of one attempt.
///
/// Dropping the guard releases the flag, also when the attempt future is
/// dropped before completion.
struct InFlightGuard<'a>(&'a AtomicBool);

impl<'a> InFlightGuard<'a> {
    fn acquire(flag: &'a AtomicBool) -> Option<Self> {
        flag.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| Self(flag))
    }
}

impl Drop for InFlightGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}
