// src/tools/handlers/transaction.rs

use anyhow::{Context, Result};
use serde::Deserialize;
use serde_json::{json, Number, Value};

use crate::{
    blockchain::services::{history, transactions, units},
    utils::{page_limit, parse_args},
    AppState,
};

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct TransferSuiArgs {
    from_wallet: String,
    to_address: String,
    amount: Number,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct TransferObjectArgs {
    from_wallet: String,
    to_address: String,
    object_id: String,
}

#[derive(Deserialize)]
struct DigestArgs {
    digest: String,
}

#[derive(Deserialize)]
struct AddressHistoryArgs {
    address: String,
    limit: Option<f64>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct WalletHistoryArgs {
    wallet_name: String,
    limit: Option<f64>,
}

pub async fn transfer_sui(state: AppState, args: Value) -> Result<Value> {
    let args: TransferSuiArgs = parse_args(args)?;
    let amount_mist = units::sui_to_mist(&args.amount.to_string())?;
    let wallet = state.wallets.get(&args.from_wallet)?;
    let active = state.network.snapshot();

    let response = transactions::transfer_sui(
        active.client.as_ref(),
        &wallet.keypair,
        &args.to_address,
        amount_mist,
        state.config.default_gas_budget,
    )
    .await?;
    Ok(serde_json::to_value(response)?)
}

pub async fn transfer_object(state: AppState, args: Value) -> Result<Value> {
    let args: TransferObjectArgs = parse_args(args)?;
    let wallet = state.wallets.get(&args.from_wallet)?;
    let active = state.network.snapshot();

    let response = transactions::transfer_object(
        active.client.as_ref(),
        &wallet.keypair,
        &args.to_address,
        &args.object_id,
        state.config.default_gas_budget,
    )
    .await?;
    Ok(serde_json::to_value(response)?)
}

pub async fn get_transaction(state: AppState, args: Value) -> Result<Value> {
    let args: DigestArgs = parse_args(args)?;
    let active = state.network.snapshot();
    active
        .client
        .get_transaction(&args.digest)
        .await
        .with_context(|| format!("Failed to fetch transaction {}", args.digest))
}

pub async fn get_transactions(state: AppState, args: Value) -> Result<Value> {
    let args: AddressHistoryArgs = parse_args(args)?;
    let limit = page_limit(
        args.limit,
        history::DEFAULT_HISTORY_LIMIT,
        history::MAX_HISTORY_LIMIT,
    )?;
    let active = state.network.snapshot();
    history::get_transaction_history(active.client.as_ref(), &args.address, limit).await
}

pub async fn get_wallet_transactions(state: AppState, args: Value) -> Result<Value> {
    let args: WalletHistoryArgs = parse_args(args)?;
    let limit = page_limit(
        args.limit,
        history::DEFAULT_HISTORY_LIMIT,
        history::MAX_HISTORY_LIMIT,
    )?;
    let wallet = state.wallets.get(&args.wallet_name)?;
    let active = state.network.snapshot();

    let mut result =
        history::get_transaction_history(active.client.as_ref(), &wallet.address, limit).await?;
    result["wallet"] = json!(wallet.name);
    Ok(result)
}

pub async fn get_gas_price(state: AppState, _args: Value) -> Result<Value> {
    let active = state.network.snapshot();
    let price = active
        .client
        .get_reference_gas_price()
        .await
        .context("Failed to fetch reference gas price")?;
    Ok(json!({
        "network": active.network,
        "referenceGasPrice": price.to_string(),
        "unit": "MIST",
    }))
}
