// src/lib.rs

use std::sync::Arc;

use anyhow::{Context, Result};

// Re-export modules
pub mod api;
pub mod blockchain;
pub mod config;
pub mod mcp;
pub mod tools;
pub mod utils;

use blockchain::{client::ChainConnector, network::NetworkState, wallet_manager::WalletManager};

/// Application state shared across all request handlers
#[derive(Clone)]
pub struct AppState {
    /// Application configuration
    pub config: Arc<config::Config>,
    /// Wallets created or imported during this session
    pub wallets: WalletManager,
    /// Active network and the chain client bound to it
    pub network: NetworkState,
    /// Tool catalog, handlers and dispatch policy
    pub tools: Arc<tools::Dispatcher>,
}

impl AppState {
    /// Builds session state; fails if the tool catalog and handlers disagree
    /// or the initial RPC endpoint is unusable.
    pub fn new(config: config::Config, connector: Arc<dyn ChainConnector>) -> Result<Self> {
        let tools = tools::build_dispatcher(&config).context("Invalid tool registry")?;
        let rpc_url = config.rpc_url(config.network);
        let network = NetworkState::new(config.network, &rpc_url, connector)
            .with_context(|| format!("Failed to connect to {}", rpc_url))?;

        Ok(Self {
            config: Arc::new(config),
            wallets: WalletManager::new(),
            network,
            tools: Arc::new(tools),
        })
    }
}
