//! Connects a wallet to a Lockler chain from the terminal.
//!
//! # Usage
//!
//! ```bash
//! # Connect on the configured default chain (mainnet unless configured)
//! cargo run -p lockler-cli
//!
//! # Connect on Polygon Amoy, by id or by network name
//! cargo run -p lockler-cli -- --chain 80002
//! cargo run -p lockler-cli -- --chain amoy
//!
//! # Configure logging level
//! RUST_LOG=debug cargo run -p lockler-cli
//! ```
//!
//! # Environment Variables
//!
//! - `CONFIG` - Path to TOML configuration file (default: `lockler.toml`)
//! - `WALLET_RPC_URL` - Override the wallet endpoint
//! - `RUST_LOG` - Log level filter (default: `info`)

use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use lockler::chain::{ChainId, ChainRegistry};
use lockler::connector::{ProviderResolver, WalletConnector};
use lockler::state::{ConnectionState, ConnectionStore};
use lockler::view::{ConnectionView, ViewState};
use lockler_evm::{Eip1193Connector, Erc721Reader, EvmProviderResolver, EvmWalletSession};
use tracing_subscriber::EnvFilter;

use lockler_cli::config::{LockConfig, LocklerConfig};

/// Connect a wallet to a Lockler chain.
#[derive(Debug, Parser)]
#[command(name = "lockler", version, about)]
struct Args {
    /// Path to the TOML configuration file.
    #[arg(long, env = "CONFIG", default_value = "lockler.toml")]
    config: PathBuf,

    /// Chain to connect to, as a numeric id or a network name (e.g. `sepolia`).
    #[arg(long)]
    chain: Option<String>,

    /// Seconds to wait for the wallet to report the connection.
    #[arg(long, default_value_t = 30)]
    wait_secs: u64,
}

#[tokio::main]
async fn main() -> ExitCode {
    dotenvy::dotenv().ok();

    // Initialize tracing with RUST_LOG env filter
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();
    match run(args).await {
        Ok(rendered) if is_success(&rendered) => ExitCode::SUCCESS,
        Ok(_) => ExitCode::FAILURE,
        Err(e) => {
            tracing::error!("Lockler failed: {e}");
            ExitCode::FAILURE
        }
    }
}

/// Only a connected wallet counts as success; an error or a wallet that never
/// reported an account within the wait fails.
const fn is_success(rendered: &ViewState) -> bool {
    matches!(rendered, ViewState::Connected { .. })
}

#[allow(clippy::print_stdout)]
async fn run(args: Args) -> Result<ViewState, Box<dyn std::error::Error>> {
    let config = LocklerConfig::load_from(&args.config)?;
    let registry = ChainRegistry::default();
    let chain_id = select_chain(&registry, args.chain.as_deref(), config.default_chain)?;
    tracing::info!(
        config = %args.config.display(),
        chain_id,
        wallet = %config.wallet.rpc_url,
        "Loaded configuration"
    );

    let mut resolver = EvmProviderResolver::new();
    for (chain, endpoints) in config.endpoints() {
        if !registry.contains(chain) {
            tracing::warn!(chain_id = chain, "Endpoints configured for an unsupported chain");
        }
        resolver.add_endpoints(chain, endpoints);
    }
    if resolver.chains().next().is_none() {
        tracing::warn!("No RPC endpoints configured - every chain will be reported unsupported");
    }
    let resolver = Arc::new(resolver);

    // The wallet has not reported anything yet; seed the chain to connect to.
    let store = ConnectionStore::with_state(ConnectionState {
        address: None,
        chain_id: Some(chain_id),
        is_connected: false,
    });
    let connector = WalletConnector::new(
        registry,
        Arc::clone(&resolver),
        EvmWalletSession::new(),
        Eip1193Connector::new(config.wallet.rpc_url.clone(), store.clone()),
    );
    let mut view = ConnectionView::new(Arc::new(connector), store.subscribe());

    println!("{}", view.render());
    let mut rendered = view.connect().await;
    if rendered == ViewState::Disconnected {
        let wait = Duration::from_secs(args.wait_secs);
        if let Ok(Some(next)) = tokio::time::timeout(wait, view.changed()).await {
            rendered = next;
        } else {
            tracing::warn!(wait_secs = args.wait_secs, "Wallet did not report a connection");
        }
    }
    println!("{rendered}");

    if let (
        ViewState::Connected {
            address,
            chain_id: Some(connected_chain),
            ..
        },
        Some(lock),
    ) = (&rendered, config.lock)
    {
        report_lock_balance(&resolver, lock, *connected_chain, *address).await?;
    }

    Ok(rendered)
}

/// Picks the chain from the command line, falling back to `default_chain`.
fn select_chain(
    registry: &ChainRegistry,
    requested: Option<&str>,
    default_chain: ChainId,
) -> Result<ChainId, String> {
    let Some(requested) = requested else {
        return Ok(default_chain);
    };
    if let Ok(id) = requested.parse::<ChainId>() {
        return Ok(id);
    }
    registry
        .by_network_name(requested)
        .map(|chain| chain.id)
        .ok_or_else(|| format!("Unknown network name {requested:?}"))
}

#[allow(clippy::print_stdout)]
async fn report_lock_balance(
    resolver: &EvmProviderResolver,
    lock: LockConfig,
    chain_id: ChainId,
    owner: alloy_primitives::Address,
) -> Result<(), Box<dyn std::error::Error>> {
    let provider = resolver.get_provider(chain_id).await?;
    let reader = Erc721Reader::new(lock.erc721, provider);
    let balance = reader.balance_of(owner).await?;
    tracing::info!(contract = %reader.address(), %owner, %balance, "Queried lock contract");
    println!("Lock tokens held: {balance}");
    Ok(())
}
