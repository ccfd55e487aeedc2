#![cfg_attr(docsrs, feature(doc_auto_cfg))]

//! Wallet connection core for the Lockler dApp.
//!
//! Lockler locks and releases funds held in ERC-721 based arrangements. This
//! crate holds the part that decides which chain a wallet is attached to and
//! how a connection to it is established:
//!
//! - [`chain`] - Chain identifiers, configuration records and the chain registry
//! - [`networks`] - The supported EVM networks, with Ethereum mainnet as default
//! - [`connector`] - The four-step wallet connect pipeline and its collaborator traits
//! - [`state`] - The observed connection state and its reactive store
//! - [`view`] - The connection widget's state machine
//! - [`error`] - Connect error taxonomy
//! - [`erc721`] - ERC-721 interface descriptor
//!
//! Chain-specific collaborators live in `lockler-evm`.
//!
//! # Feature Flags
//!
//! - `telemetry` - Enables tracing instrumentation of connect attempts

pub mod chain;
pub mod connector;
pub mod erc721;
pub mod error;
pub mod networks;
pub mod state;
pub mod view;

pub use chain::{ChainConfig, ChainId, ChainRegistry};
pub use connector::{
    ConnectOutcome, InjectedConnector, ProviderResolver, WalletConnector, WalletSession,
};
pub use error::{ConnectError, ConnectErrorKind, UnsupportedChainError};
pub use state::{ConnectionState, ConnectionStore};
pub use view::{ConnectionView, ViewState};
