// src/blockchain/services/transactions.rs

use anyhow::{bail, Context, Result};
use tracing::{info, warn};

use crate::blockchain::{
    client::ChainClient,
    keypair::SuiKeypair,
    models::{Coin, TransactionBlockBytes, TransferResponse},
    services::{
        address::{is_valid_sui_address, normalize_sui_address},
        units::mist_to_sui,
    },
};

pub const SUI_COIN_TYPE: &str = "0x2::sui::SUI";

/// Picks the largest SUI coin able to cover `required` MIST on its own.
pub fn select_payment_coin(coins: &[Coin], required: u64) -> Result<&Coin> {
    let largest = coins
        .iter()
        .filter_map(|coin| coin.balance.parse::<u64>().ok().map(|b| (b, coin)))
        .max_by_key(|(balance, _)| *balance);

    match largest {
        Some((balance, coin)) if balance >= required => Ok(coin),
        Some((balance, _)) => bail!(
            "Insufficient SUI balance: largest coin holds {} MIST, {} MIST required (amount + gas budget)",
            balance,
            required
        ),
        None => bail!("Insufficient SUI balance: no SUI coins owned"),
    }
}

fn checked_recipient(to_address: &str) -> Result<String> {
    if !is_valid_sui_address(to_address) {
        bail!("Invalid recipient address '{}'", to_address);
    }
    Ok(normalize_sui_address(to_address)?)
}

async fn sign_and_execute(
    client: &dyn ChainClient,
    keypair: &SuiKeypair,
    unsigned: TransactionBlockBytes,
) -> Result<serde_json::Value> {
    let signature = keypair.sign_transaction(&unsigned.tx_bytes)?;
    client
        .execute_transaction(&unsigned.tx_bytes, &signature)
        .await
        .context("Failed to execute transaction")
}

/// Turns an executed-but-aborted transaction into an error carrying the
/// digest and the node's failure reason.
fn ensure_succeeded(response: TransferResponse) -> Result<TransferResponse> {
    if response.success {
        return Ok(response);
    }
    let reason = response.error.as_deref().unwrap_or(&response.status);
    warn!(
        "Transaction {} from {} failed on chain: {}",
        response.digest, response.from, reason
    );
    bail!("Transaction {} failed: {}", response.digest, reason)
}

/// Sends `amount_mist` from the keypair's address to `to_address`.
pub async fn transfer_sui(
    client: &dyn ChainClient,
    keypair: &SuiKeypair,
    to_address: &str,
    amount_mist: u64,
    gas_budget: u64,
) -> Result<TransferResponse> {
    if amount_mist == 0 {
        bail!("Transfer amount must be greater than zero");
    }
    let recipient = checked_recipient(to_address)?;
    let sender = keypair.address();

    let required = amount_mist
        .checked_add(gas_budget)
        .context("Transfer amount is too large")?;
    let coins = client
        .get_coins(&sender, SUI_COIN_TYPE)
        .await
        .context("Failed to fetch SUI coins")?;
    let coin = select_payment_coin(&coins, required)?;

    let unsigned = client
        .build_transfer_sui(&sender, &coin.coin_object_id, gas_budget, &recipient, amount_mist)
        .await
        .context("Failed to build transfer")?;
    let executed = sign_and_execute(client, keypair, unsigned).await?;

    let mut response =
        ensure_succeeded(TransferResponse::from_execution(&sender, &recipient, &executed))?;
    info!(
        "Transferred {} MIST {} -> {} ({}, {})",
        amount_mist, sender, recipient, response.digest, response.status
    );
    response.amount = Some(mist_to_sui(amount_mist));
    response.mist = Some(amount_mist.to_string());
    Ok(response)
}

/// Moves an owned object to `to_address`; the node selects the gas coin.
pub async fn transfer_object(
    client: &dyn ChainClient,
    keypair: &SuiKeypair,
    to_address: &str,
    object_id: &str,
    gas_budget: u64,
) -> Result<TransferResponse> {
    let recipient = checked_recipient(to_address)?;
    let object_id = normalize_sui_address(object_id)
        .with_context(|| format!("Invalid object id '{}'", object_id))?;
    let sender = keypair.address();

    let unsigned = client
        .build_transfer_object(&sender, &object_id, gas_budget, &recipient)
        .await
        .context("Failed to build object transfer")?;
    let executed = sign_and_execute(client, keypair, unsigned).await?;

    let mut response =
        ensure_succeeded(TransferResponse::from_execution(&sender, &recipient, &executed))?;
    info!(
        "Transferred object {} {} -> {} ({}, {})",
        object_id, sender, recipient, response.digest, response.status
    );
    response.object_id = Some(object_id);
    Ok(response)
}
