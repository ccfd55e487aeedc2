#![cfg_attr(docsrs, feature(doc_auto_cfg))]

//! EIP-155 (EVM) collaborators for the Lockler wallet connector.
//!
//! This crate implements the chain-facing traits of [`lockler::connector`]
//! with alloy:
//!
//! - [`provider`] - [`EvmProviderResolver`], HTTP providers with fallback and rate limits
//! - [`wallet`] - [`EvmWalletSession`] and the EIP-1193 [`Eip1193Connector`]
//! - [`contract`] - ERC-721 `sol!` bindings and the read-only [`Erc721Reader`]
//!
//! # Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use lockler::{ChainRegistry, ConnectionStore, ConnectionView, WalletConnector};
//! use lockler_evm::{Eip1193Connector, EvmProviderResolver, EvmWalletSession, RpcEndpoint};
//!
//! let store = ConnectionStore::new();
//! let resolver = EvmProviderResolver::new()
//!     .with_endpoints(1, [RpcEndpoint::new("https://eth.llamarpc.com".parse()?)]);
//! let connector = WalletConnector::new(
//!     ChainRegistry::default(),
//!     resolver,
//!     EvmWalletSession::new(),
//!     Eip1193Connector::new("http://127.0.0.1:8545".parse()?, store.clone()),
//! );
//! let mut view = ConnectionView::new(Arc::new(connector), store.subscribe());
//! println!("{}", view.connect().await);
//! ```
//!
//! # Feature Flags
//!
//! - `telemetry` - Tracing instrumentation for provider resolution and handshakes

pub mod contract;
pub mod provider;
pub mod wallet;

#[cfg(test)]
mod test_utils;

pub use contract::{Erc721Error, Erc721Reader, IERC721};
pub use provider::{EvmProviderResolver, RpcEndpoint};
pub use wallet::{Eip1193Connector, EvmWalletSession};
