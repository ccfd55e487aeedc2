//! Supported EVM networks.
//!
//! [`SUPPORTED_CHAINS`] is the default content of a
//! [`ChainRegistry`](crate::chain::ChainRegistry). [`MAINNET`] is the chain
//! substituted when the wallet reports no chain at all.

use crate::chain::{ChainConfig, ChainId};

/// Ethereum Mainnet chain ID.
pub const MAINNET: ChainId = 1;

/// Ethereum Sepolia (testnet) chain ID.
pub const SEPOLIA: ChainId = 11_155_111;

/// Ethereum Holesky (testnet) chain ID.
pub const HOLESKY: ChainId = 17000;

/// Polygon Mainnet chain ID.
pub const POLYGON: ChainId = 137;

/// Polygon Amoy (testnet) chain ID.
pub const POLYGON_AMOY: ChainId = 80002;

/// Base Mainnet chain ID.
pub const BASE: ChainId = 8453;

/// Base Sepolia (testnet) chain ID.
pub const BASE_SEPOLIA: ChainId = 84532;

/// Arbitrum One chain ID.
pub const ARBITRUM_ONE: ChainId = 42161;

/// OP Mainnet chain ID.
pub const OPTIMISM: ChainId = 10;

/// All chains Lockler can connect to.
pub const SUPPORTED_CHAINS: &[ChainConfig] = &[
    ChainConfig {
        id: MAINNET,
        name: "Ethereum",
        network: "mainnet",
        native_currency: "ETH",
        explorer_url: "https://etherscan.io",
        testnet: false,
    },
    ChainConfig {
        id: SEPOLIA,
        name: "Sepolia",
        network: "sepolia",
        native_currency: "ETH",
        explorer_url: "https://sepolia.etherscan.io",
        testnet: true,
    },
    ChainConfig {
        id: HOLESKY,
        name: "Holesky",
        network: "holesky",
        native_currency: "ETH",
        explorer_url: "https://holesky.etherscan.io",
        testnet: true,
    },
    ChainConfig {
        id: POLYGON,
        name: "Polygon",
        network: "polygon",
        native_currency: "POL",
        explorer_url: "https://polygonscan.com",
        testnet: false,
    },
    ChainConfig {
        id: POLYGON_AMOY,
        name: "Polygon Amoy",
        network: "amoy",
        native_currency: "POL",
        explorer_url: "https://amoy.polygonscan.com",
        testnet: true,
    },
    ChainConfig {
        id: BASE,
        name: "Base",
        network: "base",
        native_currency: "ETH",
        explorer_url: "https://basescan.org",
        testnet: false,
    },
    ChainConfig {
        id: BASE_SEPOLIA,
        name: "Base Sepolia",
        network: "base-sepolia",
        native_currency: "ETH",
        explorer_url: "https://sepolia.basescan.org",
        testnet: true,
    },
    ChainConfig {
        id: ARBITRUM_ONE,
        name: "Arbitrum One",
        network: "arbitrum",
        native_currency: "ETH",
        explorer_url: "https://arbiscan.io",
        testnet: false,
    },
    ChainConfig {
        id: OPTIMISM,
        name: "OP Mainnet",
        network: "optimism",
        native_currency: "ETH",
        explorer_url: "https://optimistic.etherscan.io",
        testnet: false,
    },
];
