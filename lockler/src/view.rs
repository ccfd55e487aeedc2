//! Connection-state view.
//!
//! [`ConnectionView`] reads the externally owned [`ConnectionState`] through a
//! [`watch::Receiver`], keeps its own error state, and selects one of three
//! mutually exclusive [`ViewState`]s, evaluated in this order:
//!
//! 1. [`ViewState::Error`] when an error message is present
//! 2. [`ViewState::Disconnected`] when no address is present
//! 3. [`ViewState::Connected`] otherwise
//!
//! A successful connect attempt does not change the view directly. The
//! wallet publishes the new state, and the next [`ConnectionView::render`]
//! picks it up.

use std::fmt;
use std::sync::Arc;

use alloy_primitives::Address;
use tokio::sync::watch;

use crate::chain::ChainId;
use crate::connector::{
    ConnectOutcome, InjectedConnector, ProviderResolver, WalletConnector, WalletSession,
};
use crate::error::ConnectErrorKind;
use crate::networks::MAINNET;
use crate::state::ConnectionState;

/// What the view currently shows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ViewState {
    /// The last attempt failed. A retry action is offered.
    Error {
        /// Message shown to the user.
        message: String,
    },
    /// No wallet account. A connect action is offered.
    Disconnected,
    /// A wallet account is connected.
    Connected {
        /// The connected account.
        address: Address,
        /// Chain the wallet is attached to, if reported.
        chain_id: Option<ChainId>,
        /// Display name of that chain, if it is registered.
        chain_name: Option<&'static str>,
    },
}

impl ViewState {
    /// Returns `true` if the connect (or retry) action is offered.
    #[must_use]
    pub const fn offers_connect(&self) -> bool {
        matches!(self, Self::Error { .. } | Self::Disconnected)
    }
}

impl fmt::Display for ViewState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Error { message } => write!(f, "Error: {message} [Retry]"),
            Self::Disconnected => f.write_str("[Connect Wallet]"),
            Self::Connected {
                address,
                chain_id,
                chain_name,
            } => {
                write!(f, "Connected: {}", address.to_checksum(None))?;
                match (chain_name, chain_id) {
                    (Some(name), Some(id)) => write!(f, " on {name} ({id})"),
                    (None, Some(id)) => write!(f, " on chain {id}"),
                    _ => Ok(()),
                }
            }
        }
    }
}

/// Local error state of the view.
#[derive(Debug, Clone, PartialEq, Eq)]
struct ErrorState {
    message: String,
    kind: ConnectErrorKind,
}

/// Connection widget logic, independent of any rendering toolkit.
pub struct ConnectionView<R, S, I> {
    connector: Arc<WalletConnector<R, S, I>>,
    state: watch::Receiver<ConnectionState>,
    error: Option<ErrorState>,
}

impl<R, S, I> fmt::Debug for ConnectionView<R, S, I> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConnectionView")
            .field("state", &*self.state.borrow())
            .field("error", &self.error)
            .finish_non_exhaustive()
    }
}

impl<R, S, I> ConnectionView<R, S, I>
where
    R: ProviderResolver,
    S: WalletSession<R::Provider>,
    I: InjectedConnector,
{
    /// Creates a view over `state` that connects through `connector`.
    pub const fn new(
        connector: Arc<WalletConnector<R, S, I>>,
        state: watch::Receiver<ConnectionState>,
    ) -> Self {
        Self {
            connector,
            state,
            error: None,
        }
    }

    /// Selects the state to show from the current external state and the
    /// local error.
    pub fn render(&self) -> ViewState {
        if let Some(error) = &self.error {
            return ViewState::Error {
                message: error.message.clone(),
            };
        }
        let state = *self.state.borrow();
        match state.address {
            None => ViewState::Disconnected,
            Some(address) => ViewState::Connected {
                address,
                chain_id: state.chain_id,
                chain_name: state.chain_id.and_then(|id| {
                    self.connector.registry().resolve(id).ok().map(|c| c.name)
                }),
            },
        }
    }

    /// Message of the last failed attempt, if any.
    pub fn error_message(&self) -> Option<&str> {
        self.error.as_ref().map(|e| e.message.as_str())
    }

    /// Structured cause of the last failed attempt, if any.
    pub fn error_kind(&self) -> Option<ConnectErrorKind> {
        self.error.as_ref().map(|e| e.kind)
    }

    /// Chain the next attempt targets: the wallet's chain, or [`MAINNET`].
    pub fn target_chain(&self) -> ChainId {
        self.state.borrow().chain_id.unwrap_or(MAINNET)
    }

    /// Handles the connect (or retry) action.
    ///
    /// Failures are captured into the view's error state and never returned.
    pub async fn connect(&mut self) -> ViewState {
        let chain_id = self.target_chain();
        match self.connector.connect(chain_id).await {
            Ok(ConnectOutcome::Connected) => self.error = None,
            Ok(ConnectOutcome::AlreadyPending) => {}
            Err(err) => {
                #[cfg(feature = "telemetry")]
                tracing::warn!(chain_id, kind = %err.kind(), error = %err, "Wallet connect failed");
                self.error = Some(ErrorState {
                    message: err.user_message(),
                    kind: err.kind(),
                });
            }
        }
        self.render()
    }

    /// Waits for the next external state change and returns the new view.
    ///
    /// Returns `None` once the store has been dropped.
    pub async fn changed(&mut self) -> Option<ViewState> {
        self.state.changed().await.ok()?;
        Some(self.render())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::connector::tests::{ALICE, MockConnector, Mocks};
    use crate::error::{ConnectError, GENERIC_CONNECT_ERROR};
    use crate::networks::{POLYGON, SEPOLIA};
    use crate::state::ConnectionStore;
    use alloy_primitives::address;
    use std::time::Duration;
    use tokio::sync::Notify;

    type MockView = ConnectionView<
        crate::connector::tests::MockResolver,
        crate::connector::tests::MockSession,
        crate::connector::tests::MockInjected,
    >;

    fn view(connector: MockConnector, store: &ConnectionStore) -> MockView {
        ConnectionView::new(Arc::new(connector), store.subscribe())
    }

    fn with_error(mut view: MockView, message: &str) -> MockView {
        view.error = Some(ErrorState {
            message: message.to_owned(),
            kind: ConnectErrorKind::ConnectionRejected,
        });
        view
    }

    #[test]
    fn test_error_takes_precedence_over_disconnected() {
        let mocks = Mocks::default();
        let view = with_error(view(mocks.build(), &mocks.store), "x");
        assert_eq!(
            view.render(),
            ViewState::Error {
                message: "x".into()
            }
        );
        assert!(view.render().offers_connect());
    }

    #[test]
    fn test_error_takes_precedence_over_connected() {
        let mocks = Mocks::default();
        mocks.store.publish(ConnectionState::connected(ALICE, 1));
        let view = with_error(view(mocks.build(), &mocks.store), "x");
        assert!(matches!(view.render(), ViewState::Error { .. }));
    }

    #[test]
    fn test_no_address_renders_disconnected() {
        let mocks = Mocks::default();
        let view = view(mocks.build(), &mocks.store);
        assert_eq!(view.render(), ViewState::Disconnected);
        assert_eq!(view.render().to_string(), "[Connect Wallet]");
    }

    #[test]
    fn test_address_without_error_renders_connected_with_chain_name() {
        let mocks = Mocks::default();
        let address = address!("0000000000000000000000000000000000000abc");
        mocks
            .store
            .publish(ConnectionState::connected(address, POLYGON));
        let view = view(mocks.build(), &mocks.store);

        let rendered = view.render();
        assert_eq!(
            rendered,
            ViewState::Connected {
                address,
                chain_id: Some(POLYGON),
                chain_name: Some("Polygon"),
            }
        );
        assert!(!rendered.offers_connect());
        assert_eq!(
            rendered.to_string(),
            format!("Connected: {} on Polygon (137)", address.to_checksum(None))
        );
    }

    #[test]
    fn test_unregistered_live_chain_renders_without_name() {
        let mocks = Mocks::default();
        mocks.store.publish(ConnectionState::connected(ALICE, 31337));
        let view = view(mocks.build(), &mocks.store);
        assert!(matches!(
            view.render(),
            ViewState::Connected {
                chain_id: Some(31337),
                chain_name: None,
                ..
            }
        ));
    }

    #[test]
    fn test_missing_chain_defaults_to_mainnet() {
        let mocks = Mocks::default();
        let view = view(mocks.build(), &mocks.store);
        assert_eq!(view.target_chain(), MAINNET);

        mocks.store.publish(ConnectionState {
            address: None,
            chain_id: Some(SEPOLIA),
            is_connected: false,
        });
        assert_eq!(view.target_chain(), SEPOLIA);
    }

    #[tokio::test]
    async fn test_successful_connect_moves_to_connected() {
        let mocks = Mocks::default();
        let mut view = view(mocks.build(), &mocks.store);
        assert_eq!(view.render(), ViewState::Disconnected);

        let rendered = view.connect().await;

        assert!(view.error_message().is_none());
        assert_eq!(
            rendered,
            ViewState::Connected {
                address: ALICE,
                chain_id: Some(MAINNET),
                chain_name: Some("Ethereum"),
            }
        );
    }

    #[tokio::test]
    async fn test_changed_reports_external_update() {
        let mocks = Mocks::default();
        let mut view = view(mocks.build(), &mocks.store);
        let store = mocks.store.clone();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(10)).await;
            store.publish(ConnectionState::connected(ALICE, SEPOLIA));
        });

        let rendered = view.changed().await.unwrap();
        assert!(matches!(
            rendered,
            ViewState::Connected {
                chain_name: Some("Sepolia"),
                ..
            }
        ));
    }

    #[tokio::test]
    async fn test_unsupported_chain_sets_error_without_side_effects() {
        let mocks = Mocks::default();
        mocks.store.publish(ConnectionState {
            address: None,
            chain_id: Some(999_999),
            is_connected: false,
        });
        let mut view = view(mocks.build(), &mocks.store);

        let rendered = view.connect().await;

        assert_eq!(
            rendered,
            ViewState::Error {
                message: "Unsupported chain id 999999".into()
            }
        );
        assert_eq!(view.error_kind(), Some(ConnectErrorKind::UnsupportedChain));
        assert!(mocks.log.calls().is_empty());
    }

    #[tokio::test]
    async fn test_rejected_handshake_never_shows_connected() {
        let mocks = Mocks {
            handshake_error: Some(ConnectError::rejected("User rejected the request.")),
            ..Mocks::default()
        };
        let mut view = view(mocks.build(), &mocks.store);

        let rendered = view.connect().await;

        assert_eq!(
            rendered,
            ViewState::Error {
                message: "User rejected the request.".into()
            }
        );
        assert_eq!(mocks.store.snapshot().address, None);
        assert_eq!(
            view.error_kind(),
            Some(ConnectErrorKind::ConnectionRejected)
        );
    }

    #[tokio::test]
    async fn test_blank_error_uses_generic_message() {
        let mocks = Mocks {
            session_error: Some(ConnectError::rejected("")),
            ..Mocks::default()
        };
        let mut view = view(mocks.build(), &mocks.store);
        view.connect().await;
        assert_eq!(view.error_message(), Some(GENERIC_CONNECT_ERROR));
    }

    #[tokio::test]
    async fn test_retry_after_failure_clears_error() {
        let mocks = Mocks::default();
        let mut view = with_error(view(mocks.build(), &mocks.store), "previous failure");
        assert!(matches!(view.render(), ViewState::Error { .. }));

        let rendered = view.connect().await;

        assert!(matches!(rendered, ViewState::Connected { .. }));
        assert!(view.error_kind().is_none());
    }

    #[tokio::test]
    async fn test_pending_attempt_keeps_existing_error() {
        let gate = Arc::new(Notify::new());
        let mocks = Mocks {
            gate: Some(Arc::clone(&gate)),
            ..Mocks::default()
        };
        let connector = Arc::new(mocks.build());
        let mut first = ConnectionView::new(Arc::clone(&connector), mocks.store.subscribe());
        let mut second = with_error(
            ConnectionView::new(Arc::clone(&connector), mocks.store.subscribe()),
            "previous failure",
        );

        let pending = tokio::spawn(async move { first.connect().await });
        while !connector.is_pending() {
            tokio::task::yield_now().await;
        }

        let rendered = second.connect().await;

        assert_eq!(
            rendered,
            ViewState::Error {
                message: "previous failure".into()
            }
        );
        assert_eq!(
            second.error_kind(),
            Some(ConnectErrorKind::ConnectionRejected)
        );

        gate.notify_one();
        assert!(matches!(
            pending.await.unwrap(),
            ViewState::Connected { .. }
        ));
        assert_eq!(second.error_message(), Some("previous failure"));
    }
}
