// src/blockchain/services/faucet.rs

use anyhow::{bail, Context, Result};
use serde_json::{json, Value};
use tracing::info;

use crate::blockchain::{client::ChainClient, network::Network};
use crate::config::Config;

/// Faucet endpoint for `network`, honoring the configured override.
pub fn faucet_url(config: &Config, network: Network) -> Result<String> {
    if network == Network::Mainnet {
        bail!("Faucet is not available on mainnet");
    }
    if let Some(url) = &config.faucet_url {
        return Ok(url.clone());
    }
    network
        .default_faucet_url()
        .map(str::to_string)
        .with_context(|| format!("No faucet configured for {}", network))
}

/// Requests test SUI for `recipient` from the faucet at `url`.
pub async fn request_tokens(
    client: &dyn ChainClient,
    network: Network,
    url: &str,
    recipient: &str,
) -> Result<Value> {
    info!("Requesting faucet tokens for {} on {} via {}", recipient, network, url);

    let faucet = client.request_faucet(url, recipient).await?;
    Ok(json!({
        "success": true,
        "network": network,
        "address": recipient,
        "faucetUrl": url,
        "faucetResponse": faucet,
    }))
}
