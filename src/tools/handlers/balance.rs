// src/tools/handlers/balance.rs

use anyhow::{bail, Context, Result};
use serde::Deserialize;
use serde_json::{json, Value};

use crate::{
    blockchain::services::{balance, transactions::SUI_COIN_TYPE},
    tools::handlers::wallet::WalletNameArgs,
    utils::{page_limit, parse_args},
    AppState,
};

const DEFAULT_OBJECT_LIMIT: u64 = 50;
const MAX_OBJECT_LIMIT: u64 = 50;

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct GetBalanceArgs {
    wallet_name: String,
    coin_type: Option<String>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct GetObjectsArgs {
    wallet_name: String,
    filter: Option<Value>,
    limit: Option<f64>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ObjectIdArgs {
    object_id: String,
}

pub async fn get_balance(state: AppState, args: Value) -> Result<Value> {
    let args: GetBalanceArgs = parse_args(args)?;
    let coin_type = args.coin_type.unwrap_or_else(|| SUI_COIN_TYPE.to_string());
    let wallet = state.wallets.get(&args.wallet_name)?;
    let active = state.network.snapshot();

    let fetched = active
        .client
        .get_balance(&wallet.address, &coin_type)
        .await
        .context("Failed to fetch balance")?;

    Ok(json!({
        "wallet": wallet.name,
        "address": wallet.address,
        "coinType": coin_type,
        "balance": balance::balance_summary(&fetched),
    }))
}

pub async fn get_all_balances(state: AppState, args: Value) -> Result<Value> {
    let args: WalletNameArgs = parse_args(args)?;
    let wallet = state.wallets.get(&args.wallet_name)?;
    let active = state.network.snapshot();

    let balances = active
        .client
        .get_all_balances(&wallet.address)
        .await
        .context("Failed to fetch balances")?;

    Ok(json!({
        "wallet": wallet.name,
        "address": wallet.address,
        "balances": balances.iter().map(balance::describe_balance).collect::<Vec<_>>(),
    }))
}

pub async fn get_objects(state: AppState, args: Value) -> Result<Value> {
    let args: GetObjectsArgs = parse_args(args)?;
    let limit = page_limit(args.limit, DEFAULT_OBJECT_LIMIT, MAX_OBJECT_LIMIT)?;
    let wallet = state.wallets.get(&args.wallet_name)?;
    let active = state.network.snapshot();

    let page = active
        .client
        .get_owned_objects(&wallet.address, args.filter, Some(limit))
        .await
        .context("Failed to fetch owned objects")?;

    let objects = page.get("data").cloned().unwrap_or_else(|| json!([]));
    Ok(json!({
        "wallet": wallet.name,
        "address": wallet.address,
        "count": objects.as_array().map(Vec::len).unwrap_or(0),
        "objects": objects,
        "hasNextPage": page.get("hasNextPage").cloned().unwrap_or(json!(false)),
        "nextCursor": page.get("nextCursor"),
    }))
}

pub async fn get_object_details(state: AppState, args: Value) -> Result<Value> {
    let args: ObjectIdArgs = parse_args(args)?;
    let active = state.network.snapshot();

    let response = active
        .client
        .get_object(&args.object_id)
        .await
        .context("Failed to fetch object")?;

    // Missing or deleted objects come back as `{ "error": {...} }`.
    if let Some(error) = response.get("error") {
        bail!("Object '{}' not available: {}", args.object_id, error);
    }
    Ok(response.get("data").cloned().unwrap_or(response))
}
