use std::collections::HashSet;

use anyhow::{Context, Result};
use serde_json::{json, Value};
use tracing::info;

use crate::blockchain::client::ChainClient;

pub const DEFAULT_HISTORY_LIMIT: u64 = 10;
/// Largest page a full node serves for `suix_queryTransactionBlocks`.
pub const MAX_HISTORY_LIMIT: u64 = 50;

fn page_data(page: &Value) -> Vec<Value> {
    page.get("data")
        .and_then(Value::as_array)
        .cloned()
        .unwrap_or_default()
}

fn timestamp_ms(tx: &Value) -> u64 {
    match tx.get("timestampMs") {
        Some(Value::String(s)) => s.parse().unwrap_or(0),
        Some(Value::Number(n)) => n.as_u64().unwrap_or(0),
        _ => 0,
    }
}

/// Merges sent and received transactions, newest first, without duplicates.
pub fn merge_history(sent: Vec<Value>, received: Vec<Value>, limit: usize) -> Vec<Value> {
    let mut seen = HashSet::new();
    let mut merged: Vec<Value> = sent
        .into_iter()
        .chain(received)
        .filter(|tx| {
            let digest = tx
                .get("digest")
                .and_then(Value::as_str)
                .unwrap_or_default()
                .to_string();
            seen.insert(digest)
        })
        .collect();
    merged.sort_by_key(|tx| std::cmp::Reverse(timestamp_ms(tx)));
    merged.truncate(limit);
    merged
}

/// Transactions sent from or received by `address`.
pub async fn get_transaction_history(
    client: &dyn ChainClient,
    address: &str,
    limit: u64,
) -> Result<Value> {
    let limit = limit.clamp(1, MAX_HISTORY_LIMIT);
    info!("Fetching up to {} transactions for {}", limit, address);

    let sent = client
        .query_transactions(json!({ "FromAddress": address }), limit)
        .await
        .context("Failed to query sent transactions")?;
    let received = client
        .query_transactions(json!({ "ToAddress": address }), limit)
        .await
        .context("Failed to query received transactions")?;

    let transactions = merge_history(page_data(&sent), page_data(&received), limit as usize);
    Ok(json!({
        "address": address,
        "count": transactions.len(),
        "transactions": transactions,
    }))
}
