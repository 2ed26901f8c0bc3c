// src/config.rs

use std::collections::HashMap;
use std::env;
use std::time::Duration;

use anyhow::{bail, Context, Result};
use url::Url;

use crate::blockchain::network::Network;

pub const DEFAULT_TOOL_TIMEOUT_MS: u64 = 10_000;
/// 0.01 SUI
pub const DEFAULT_GAS_BUDGET: u64 = 10_000_000;
pub const DEFAULT_PORT: u16 = 8080;

// A struct to hold all configuration, loaded once at startup from the environment / .env file.
#[derive(Clone, Debug)]
pub struct Config {
    // Server settings
    pub port: u16,
    /// Serve JSON-RPC over HTTP instead of stdio.
    pub http_mode: bool,

    /// Network active at startup.
    pub network: Network,
    /// Per-network RPC endpoint overrides from `SUI_RPC_URLS`.
    pub rpc_urls: HashMap<Network, String>,
    /// Faucet override applied to every network that has a faucet.
    pub faucet_url: Option<String>,

    // Tool settings
    pub tool_timeout: Duration,
    pub default_gas_budget: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            port: DEFAULT_PORT,
            http_mode: false,
            network: Network::Devnet,
            rpc_urls: HashMap::new(),
            faucet_url: None,
            tool_timeout: Duration::from_millis(DEFAULT_TOOL_TIMEOUT_MS),
            default_gas_budget: DEFAULT_GAS_BUDGET,
        }
    }
}

fn validate_url(name: &str, value: &str) -> Result<()> {
    let url = Url::parse(value).with_context(|| format!("{} contains an invalid URL '{}'", name, value))?;
    if !matches!(url.scheme(), "http" | "https") {
        bail!("{} must use http or https, got '{}'", name, value);
    }
    Ok(())
}

impl Config {
    /// RPC endpoint for `network`: the configured override or the public default.
    pub fn rpc_url(&self, network: Network) -> String {
        self.rpc_urls
            .get(&network)
            .cloned()
            .unwrap_or_else(|| network.default_rpc_url().to_string())
    }

    /// Loads configuration from environment variables.
    pub fn from_env() -> Result<Self> {
        // Load variables from the .env file into the environment
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds a configuration from an arbitrary variable source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let network = match lookup("SUI_NETWORK") {
            Some(value) => value
                .parse::<Network>()
                .context("SUI_NETWORK must be one of mainnet, testnet, devnet, localnet")?,
            None => defaults.network,
        };

        let mut rpc_urls = HashMap::new();
        if let Some(raw) = lookup("SUI_RPC_URLS") {
            let parsed: HashMap<String, String> = serde_json::from_str(&raw)
                .context("Invalid SUI_RPC_URLS JSON format, expected {\"network\": \"url\"}")?;
            for (name, url) in parsed {
                let network = name
                    .parse::<Network>()
                    .with_context(|| format!("SUI_RPC_URLS has an unknown network '{}'", name))?;
                validate_url("SUI_RPC_URLS", &url)?;
                rpc_urls.insert(network, url);
            }
        }

        let faucet_url = lookup("SUI_FAUCET_URL").filter(|v| !v.trim().is_empty());
        if let Some(url) = &faucet_url {
            validate_url("SUI_FAUCET_URL", url)?;
        }

        let tool_timeout_ms = match lookup("TOOL_TIMEOUT_MS") {
            Some(value) => value
                .parse::<u64>()
                .context("TOOL_TIMEOUT_MS must be a valid number")?,
            None => DEFAULT_TOOL_TIMEOUT_MS,
        };
        if tool_timeout_ms == 0 {
            bail!("TOOL_TIMEOUT_MS must be greater than zero");
        }

        Ok(Config {
            port: match lookup("PORT") {
                Some(value) => value.parse().context("PORT must be a valid number")?,
                None => defaults.port,
            },
            http_mode: lookup("MCP_HTTP")
                .map(|v| !matches!(v.trim(), "" | "0" | "false"))
                .unwrap_or(false),
            network,
            rpc_urls,
            faucet_url,
            tool_timeout: Duration::from_millis(tool_timeout_ms),
            default_gas_budget: match lookup("DEFAULT_GAS_BUDGET") {
                Some(value) => value
                    .parse()
                    .context("DEFAULT_GAS_BUDGET must be a valid number")?,
                None => defaults.default_gas_budget,
            },
        })
    }
}
