// src/blockchain/network.rs

use std::fmt;
use std::str::FromStr;
use std::sync::{Arc, RwLock};

use anyhow::{anyhow, Result};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::blockchain::client::{ChainClient, ChainConnector};

/// The Sui networks this server can talk to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Network {
    Mainnet,
    Testnet,
    Devnet,
    Localnet,
}

impl Network {
    pub const ALL: [Network; 4] = [
        Network::Mainnet,
        Network::Testnet,
        Network::Devnet,
        Network::Localnet,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Network::Mainnet => "mainnet",
            Network::Testnet => "testnet",
            Network::Devnet => "devnet",
            Network::Localnet => "localnet",
        }
    }

    /// Public full node endpoint for the network.
    pub fn default_rpc_url(&self) -> &'static str {
        match self {
            Network::Mainnet => "https://fullnode.mainnet.sui.io:443",
            Network::Testnet => "https://fullnode.testnet.sui.io:443",
            Network::Devnet => "https://fullnode.devnet.sui.io:443",
            Network::Localnet => "http://127.0.0.1:9000",
        }
    }

    /// Faucet endpoint, `None` on mainnet.
    pub fn default_faucet_url(&self) -> Option<&'static str> {
        match self {
            Network::Mainnet => None,
            Network::Testnet => Some("https://faucet.testnet.sui.io/v2/gas"),
            Network::Devnet => Some("https://faucet.devnet.sui.io/v2/gas"),
            Network::Localnet => Some("http://127.0.0.1:9123/gas"),
        }
    }
}

impl fmt::Display for Network {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Network {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "mainnet" => Ok(Network::Mainnet),
            "testnet" => Ok(Network::Testnet),
            "devnet" => Ok(Network::Devnet),
            "localnet" => Ok(Network::Localnet),
            other => Err(anyhow!("Unsupported network: {}", other)),
        }
    }
}

/// A consistent view of the active network, taken before any await.
#[derive(Clone)]
pub struct ActiveNetwork {
    pub network: Network,
    pub rpc_url: String,
    pub client: Arc<dyn ChainClient>,
}

/// Holds the active network and the chain client bound to it.
///
/// The lock is only ever held for the duration of a clone or a swap, never
/// across an await point.
#[derive(Clone)]
pub struct NetworkState {
    active: Arc<RwLock<ActiveNetwork>>,
    connector: Arc<dyn ChainConnector>,
}

impl NetworkState {
    pub fn new(
        network: Network,
        rpc_url: &str,
        connector: Arc<dyn ChainConnector>,
    ) -> Result<Self> {
        let client = connector.connect(rpc_url)?;
        Ok(Self {
            active: Arc::new(RwLock::new(ActiveNetwork {
                network,
                rpc_url: rpc_url.to_string(),
                client,
            })),
            connector,
        })
    }

    pub fn snapshot(&self) -> ActiveNetwork {
        match self.active.read() {
            Ok(guard) => guard.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    pub fn current(&self) -> Network {
        self.snapshot().network
    }

    /// Reconnects to `rpc_url` and makes `network` active. Returns the network
    /// that was active before the switch.
    pub fn switch(&self, network: Network, rpc_url: &str) -> Result<Network> {
        let client = self.connector.connect(rpc_url)?;
        let mut guard = match self.active.write() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        let previous = guard.network;
        *guard = ActiveNetwork {
            network,
            rpc_url: rpc_url.to_string(),
            client,
        };
        info!("Switched network {} -> {} ({})", previous, network, rpc_url);
        Ok(previous)
    }
}
