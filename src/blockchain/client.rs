//! Chain client for Sui full nodes.
//!
//! The rest of the server talks to the chain through the [`ChainClient`]
//! trait so tools can be exercised against an in-memory client. The
//! production implementation, [`SuiRpcClient`], speaks the documented
//! full-node JSON-RPC methods over `reqwest`.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use anyhow::{anyhow, bail, Context, Result};
use async_trait::async_trait;
use serde::{de::DeserializeOwned, Deserialize};
use serde_json::{json, Value};
use tracing::debug;
use url::Url;

use crate::blockchain::models::{Balance, Coin, CoinPage, TransactionBlockBytes};

/// Upper bound on coin pages fetched when selecting a gas/payment coin.
const MAX_COIN_PAGES: usize = 10;

/// Operations the tools need from a Sui full node.
#[async_trait]
pub trait ChainClient: Send + Sync {
    async fn get_balance(&self, owner: &str, coin_type: &str) -> Result<Balance>;

    async fn get_all_balances(&self, owner: &str) -> Result<Vec<Balance>>;

    /// One page of objects owned by `owner`.
    async fn get_owned_objects(
        &self,
        owner: &str,
        filter: Option<Value>,
        limit: Option<u64>,
    ) -> Result<Value>;

    async fn get_object(&self, object_id: &str) -> Result<Value>;

    async fn get_transaction(&self, digest: &str) -> Result<Value>;

    /// Newest-first page of transaction blocks matching `filter`.
    async fn query_transactions(&self, filter: Value, limit: u64) -> Result<Value>;

    async fn get_reference_gas_price(&self) -> Result<u64>;

    async fn get_chain_identifier(&self) -> Result<String>;

    async fn get_system_state(&self) -> Result<Value>;

    async fn get_coins(&self, owner: &str, coin_type: &str) -> Result<Vec<Coin>>;

    /// Builds (does not submit) a transfer of `amount` MIST paid from `coin_id`.
    async fn build_transfer_sui(
        &self,
        signer: &str,
        coin_id: &str,
        gas_budget: u64,
        recipient: &str,
        amount: u64,
    ) -> Result<TransactionBlockBytes>;

    /// Builds (does not submit) an object transfer; the node picks the gas coin.
    async fn build_transfer_object(
        &self,
        signer: &str,
        object_id: &str,
        gas_budget: u64,
        recipient: &str,
    ) -> Result<TransactionBlockBytes>;

    async fn execute_transaction(&self, tx_bytes: &str, signature: &str) -> Result<Value>;

    async fn request_faucet(&self, faucet_url: &str, recipient: &str) -> Result<Value>;
}

/// Creates a [`ChainClient`] bound to one RPC endpoint.
pub trait ChainConnector: Send + Sync {
    fn connect(&self, rpc_url: &str) -> Result<Arc<dyn ChainClient>>;
}

#[derive(Debug, Deserialize)]
struct RpcEnvelope {
    #[serde(default)]
    result: Option<Value>,
    #[serde(default)]
    error: Option<RpcErrorObject>,
}

#[derive(Debug, Deserialize)]
struct RpcErrorObject {
    code: i64,
    message: String,
}

/// JSON-RPC client for a single Sui full node.
pub struct SuiRpcClient {
    http: reqwest::Client,
    url: String,
    next_id: AtomicU64,
}

impl SuiRpcClient {
    pub fn new(http: reqwest::Client, url: &str) -> Result<Self> {
        Url::parse(url).with_context(|| format!("Invalid RPC URL '{}'", url))?;
        Ok(Self {
            http,
            url: url.to_string(),
            next_id: AtomicU64::new(1),
        })
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    async fn call<T: DeserializeOwned>(&self, method: &str, params: Value) -> Result<T> {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let payload = json!({
            "jsonrpc": "2.0",
            "id": id,
            "method": method,
            "params": params,
        });
        debug!(method, id, "Sui RPC request");

        let response = self
            .http
            .post(&self.url)
            .json(&payload)
            .send()
            .await
            .with_context(|| format!("Failed to call {}", method))?;
        let status = response.status();
        let envelope: RpcEnvelope = response
            .json()
            .await
            .with_context(|| format!("Invalid {} response (HTTP {})", method, status))?;

        if let Some(err) = envelope.error {
            bail!("RPC error {}: {}", err.code, err.message);
        }
        let result = envelope
            .result
            .ok_or_else(|| anyhow!("RPC response for {} missing 'result'", method))?;
        serde_json::from_value(result).with_context(|| format!("Unexpected {} result", method))
    }
}

#[async_trait]
impl ChainClient for SuiRpcClient {
    async fn get_balance(&self, owner: &str, coin_type: &str) -> Result<Balance> {
        self.call("suix_getBalance", json!([owner, coin_type])).await
    }

    async fn get_all_balances(&self, owner: &str) -> Result<Vec<Balance>> {
        self.call("suix_getAllBalances", json!([owner])).await
    }

    async fn get_owned_objects(
        &self,
        owner: &str,
        filter: Option<Value>,
        limit: Option<u64>,
    ) -> Result<Value> {
        let query = json!({
            "filter": filter,
            "options": { "showType": true, "showOwner": true, "showContent": true },
        });
        self.call("suix_getOwnedObjects", json!([owner, query, Value::Null, limit]))
            .await
    }

    async fn get_object(&self, object_id: &str) -> Result<Value> {
        let options = json!({
            "showType": true,
            "showOwner": true,
            "showContent": true,
            "showDisplay": true,
            "showPreviousTransaction": true,
            "showStorageRebate": true,
        });
        self.call("sui_getObject", json!([object_id, options])).await
    }

    async fn get_transaction(&self, digest: &str) -> Result<Value> {
        let options = json!({
            "showInput": true,
            "showEffects": true,
            "showEvents": true,
            "showBalanceChanges": true,
            "showObjectChanges": true,
        });
        self.call("sui_getTransactionBlock", json!([digest, options]))
            .await
    }

    async fn query_transactions(&self, filter: Value, limit: u64) -> Result<Value> {
        let query = json!({
            "filter": filter,
            "options": { "showInput": true, "showEffects": true },
        });
        self.call(
            "suix_queryTransactionBlocks",
            json!([query, Value::Null, limit, true]),
        )
        .await
    }

    async fn get_reference_gas_price(&self) -> Result<u64> {
        // Returned as a decimal string by current nodes, a number by older ones.
        let value: Value = self.call("suix_getReferenceGasPrice", json!([])).await?;
        match &value {
            Value::String(s) => s
                .parse()
                .with_context(|| format!("Invalid reference gas price '{}'", s)),
            Value::Number(n) => n
                .as_u64()
                .ok_or_else(|| anyhow!("Invalid reference gas price {}", n)),
            other => bail!("Invalid reference gas price {}", other),
        }
    }

    async fn get_chain_identifier(&self) -> Result<String> {
        self.call("sui_getChainIdentifier", json!([])).await
    }

    async fn get_system_state(&self) -> Result<Value> {
        self.call("suix_getLatestSuiSystemState", json!([])).await
    }

    async fn get_coins(&self, owner: &str, coin_type: &str) -> Result<Vec<Coin>> {
        let mut coins = Vec::new();
        let mut cursor: Option<String> = None;
        for _ in 0..MAX_COIN_PAGES {
            let page: CoinPage = self
                .call("suix_getCoins", json!([owner, coin_type, cursor, Value::Null]))
                .await?;
            coins.extend(page.data);
            match page.next_cursor {
                Some(next) if page.has_next_page => cursor = Some(next),
                _ => break,
            }
        }
        Ok(coins)
    }

    async fn build_transfer_sui(
        &self,
        signer: &str,
        coin_id: &str,
        gas_budget: u64,
        recipient: &str,
        amount: u64,
    ) -> Result<TransactionBlockBytes> {
        self.call(
            "unsafe_transferSui",
            json!([
                signer,
                coin_id,
                gas_budget.to_string(),
                recipient,
                amount.to_string()
            ]),
        )
        .await
    }

    async fn build_transfer_object(
        &self,
        signer: &str,
        object_id: &str,
        gas_budget: u64,
        recipient: &str,
    ) -> Result<TransactionBlockBytes> {
        self.call(
            "unsafe_transferObject",
            json!([
                signer,
                object_id,
                Value::Null,
                gas_budget.to_string(),
                recipient
            ]),
        )
        .await
    }

    async fn execute_transaction(&self, tx_bytes: &str, signature: &str) -> Result<Value> {
        let options = json!({ "showEffects": true, "showBalanceChanges": true });
        self.call(
            "sui_executeTransactionBlock",
            json!([tx_bytes, [signature], options, "WaitForLocalExecution"]),
        )
        .await
    }

    async fn request_faucet(&self, faucet_url: &str, recipient: &str) -> Result<Value> {
        let response = self
            .http
            .post(faucet_url)
            .json(&json!({ "FixedAmountRequest": { "recipient": recipient } }))
            .send()
            .await
            .context("Failed to call faucet")?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            bail!("Faucet error: status={} body={}", status, text);
        }
        response.json().await.context("Invalid faucet response")
    }
}

/// Connects [`SuiRpcClient`]s sharing one HTTP connection pool.
#[derive(Clone)]
pub struct SuiRpcConnector {
    http: reqwest::Client,
}

impl SuiRpcConnector {
    pub fn new() -> Result<Self> {
        let http = reqwest::Client::builder()
            .user_agent(concat!("sui-mcp-server/", env!("CARGO_PKG_VERSION")))
            .build()
            .context("Failed to build HTTP client")?;
        Ok(Self { http })
    }
}

impl ChainConnector for SuiRpcConnector {
    fn connect(&self, rpc_url: &str) -> Result<Arc<dyn ChainClient>> {
        Ok(Arc::new(SuiRpcClient::new(self.http.clone(), rpc_url)?))
    }
}
