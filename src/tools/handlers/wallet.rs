// src/tools/handlers/wallet.rs

use anyhow::Result;
use serde::Deserialize;
use serde_json::{json, Value};

use crate::{utils::parse_args, AppState};

#[derive(Deserialize)]
struct CreateWalletArgs {
    name: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ImportWalletArgs {
    name: String,
    mnemonic: Option<String>,
    private_key: Option<String>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct WalletNameArgs {
    pub wallet_name: String,
}

pub async fn create_wallet(state: AppState, args: Value) -> Result<Value> {
    let args: CreateWalletArgs = parse_args(args)?;
    let wallet = state.wallets.create_wallet(&args.name)?;
    Ok(json!({ "success": true, "wallet": wallet }))
}

pub async fn import_wallet(state: AppState, args: Value) -> Result<Value> {
    let args: ImportWalletArgs = parse_args(args)?;
    let wallet = state.wallets.import_wallet(
        &args.name,
        args.mnemonic.as_deref(),
        args.private_key.as_deref(),
    )?;
    Ok(json!({ "success": true, "wallet": wallet }))
}

pub async fn list_wallets(state: AppState, _args: Value) -> Result<Value> {
    let wallets = state.wallets.list();
    Ok(json!({ "count": wallets.len(), "wallets": wallets }))
}

pub async fn get_wallet_address(state: AppState, args: Value) -> Result<Value> {
    let args: WalletNameArgs = parse_args(args)?;
    let wallet = state.wallets.get(&args.wallet_name)?;
    Ok(json!({ "name": wallet.name, "address": wallet.address }))
}

pub async fn export_wallet(state: AppState, args: Value) -> Result<Value> {
    let args: WalletNameArgs = parse_args(args)?;
    let exported = state.wallets.export(&args.wallet_name)?;
    Ok(serde_json::to_value(exported)?)
}
