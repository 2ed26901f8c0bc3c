// src/tools/handlers/network.rs

use anyhow::{Context, Result};
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::warn;

use crate::{
    blockchain::{network::Network, services::faucet},
    tools::handlers::wallet::WalletNameArgs,
    utils::parse_args,
    AppState,
};

#[derive(Deserialize)]
struct SwitchNetworkArgs {
    network: String,
}

pub async fn switch_network(state: AppState, args: Value) -> Result<Value> {
    let args: SwitchNetworkArgs = parse_args(args)?;
    let network: Network = args.network.parse()?;
    let rpc_url = state.config.rpc_url(network);
    let previous = state.network.switch(network, &rpc_url)?;
    Ok(json!({
        "success": true,
        "previousNetwork": previous,
        "currentNetwork": network,
        "rpcUrl": rpc_url,
    }))
}

pub async fn get_network_info(state: AppState, _args: Value) -> Result<Value> {
    let active = state.network.snapshot();
    match active.client.get_chain_identifier().await {
        Ok(chain_id) => Ok(json!({
            "network": active.network,
            "rpcUrl": active.rpc_url,
            "chainId": chain_id,
        })),
        Err(e) => {
            warn!("Chain identifier lookup failed on {}: {:#}", active.network, e);
            Ok(json!({
                "network": active.network,
                "rpcUrl": active.rpc_url,
                "error": "Failed to fetch network details",
            }))
        }
    }
}

pub async fn get_chain_id(state: AppState, _args: Value) -> Result<Value> {
    let active = state.network.snapshot();
    let chain_id = active
        .client
        .get_chain_identifier()
        .await
        .context("Failed to fetch chain identifier")?;
    Ok(json!({ "network": active.network, "chainId": chain_id }))
}

pub async fn request_tokens_from_faucet(state: AppState, args: Value) -> Result<Value> {
    let args: WalletNameArgs = parse_args(args)?;
    let active = state.network.snapshot();
    let url = faucet::faucet_url(&state.config, active.network)?;
    let wallet = state.wallets.get(&args.wallet_name)?;

    faucet::request_tokens(active.client.as_ref(), active.network, &url, &wallet.address).await
}
