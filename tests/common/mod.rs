//! In-memory chain client and helpers shared by the integration tests.
#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use anyhow::{anyhow, bail, Result};
use async_trait::async_trait;
use serde_json::{json, Value};

use sui_mcp_server::{
    blockchain::{
        client::{ChainClient, ChainConnector},
        models::{Balance, Coin, TransactionBlockBytes},
    },
    config::Config,
    tools::{FailureKind, ToolRequest, ToolResult},
    AppState,
};

/// Canned chain responses plus a log of the writes that reached the chain.
#[derive(Default)]
pub struct MockChain {
    pub balances: Mutex<HashMap<String, Vec<Balance>>>,
    pub coins: Mutex<Vec<Coin>>,
    pub chain_id: Mutex<Option<String>>,
    pub system_state: Mutex<Value>,
    pub history: Mutex<Vec<Value>>,
    /// Applied to every read before it answers.
    pub delay: Mutex<Option<Duration>>,
    pub built_transfers: Mutex<Vec<Value>>,
    pub executed: Mutex<Vec<(String, String)>>,
    /// When set, executed transactions report this abort reason.
    pub execution_error: Mutex<Option<String>>,
    pub faucet_requests: Mutex<Vec<(String, String)>>,
}

impl MockChain {
    pub fn new() -> Arc<Self> {
        let chain = Self::default();
        *chain.chain_id.lock().unwrap() = Some("4c78adac".to_string());
        Arc::new(chain)
    }

    pub fn set_sui_balance(&self, owner: &str, mist: u64) {
        self.balances.lock().unwrap().insert(
            owner.to_string(),
            vec![Balance {
                coin_type: "0x2::sui::SUI".to_string(),
                coin_object_count: 1,
                total_balance: mist.to_string(),
            }],
        );
    }

    pub fn add_coin(&self, id: &str, mist: u64) {
        self.coins.lock().unwrap().push(Coin {
            coin_type: "0x2::sui::SUI".to_string(),
            coin_object_id: id.to_string(),
            version: "3".to_string(),
            digest: "coin-digest".to_string(),
            balance: mist.to_string(),
        });
    }

    async fn pause(&self) {
        let delay = *self.delay.lock().unwrap();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
    }

    fn executed_response(&self) -> Value {
        let status = match self.execution_error.lock().unwrap().clone() {
            Some(error) => json!({ "status": "failure", "error": error }),
            None => json!({ "status": "success" }),
        };
        json!({
            "digest": format!("digest-{}", self.executed.lock().unwrap().len()),
            "effects": { "status": status }
        })
    }
}

#[async_trait]
impl ChainClient for MockChain {
    async fn get_balance(&self, owner: &str, coin_type: &str) -> Result<Balance> {
        self.pause().await;
        let balances = self.balances.lock().unwrap();
        Ok(balances
            .get(owner)
            .and_then(|all| all.iter().find(|b| b.coin_type == coin_type).cloned())
            .unwrap_or(Balance {
                coin_type: coin_type.to_string(),
                coin_object_count: 0,
                total_balance: "0".to_string(),
            }))
    }

    async fn get_all_balances(&self, owner: &str) -> Result<Vec<Balance>> {
        self.pause().await;
        Ok(self
            .balances
            .lock()
            .unwrap()
            .get(owner)
            .cloned()
            .unwrap_or_default())
    }

    async fn get_owned_objects(
        &self,
        owner: &str,
        filter: Option<Value>,
        limit: Option<u64>,
    ) -> Result<Value> {
        self.pause().await;
        Ok(json!({
            "data": [{ "data": { "objectId": "0x5", "owner": owner } }],
            "hasNextPage": false,
            "nextCursor": null,
            "echo": { "filter": filter, "limit": limit }
        }))
    }

    async fn get_object(&self, object_id: &str) -> Result<Value> {
        self.pause().await;
        if object_id == "0xdead" {
            return Ok(json!({ "error": { "code": "notExists", "object_id": object_id } }));
        }
        Ok(json!({ "data": { "objectId": object_id, "type": "0x2::coin::Coin<0x2::sui::SUI>" } }))
    }

    async fn get_transaction(&self, digest: &str) -> Result<Value> {
        self.pause().await;
        Ok(json!({ "digest": digest }))
    }

    async fn query_transactions(&self, filter: Value, limit: u64) -> Result<Value> {
        self.pause().await;
        let history = self.history.lock().unwrap();
        let data: Vec<Value> = history
            .iter()
            .filter(|tx| match (&filter["FromAddress"], &filter["ToAddress"]) {
                (Value::String(from), _) => tx["sender"] == *from,
                (_, Value::String(to)) => tx["recipient"] == *to,
                _ => false,
            })
            .take(limit as usize)
            .cloned()
            .collect();
        Ok(json!({ "data": data, "hasNextPage": false, "nextCursor": null }))
    }

    async fn get_reference_gas_price(&self) -> Result<u64> {
        self.pause().await;
        Ok(750)
    }

    async fn get_chain_identifier(&self) -> Result<String> {
        self.pause().await;
        self.chain_id
            .lock()
            .unwrap()
            .clone()
            .ok_or_else(|| anyhow!("connection refused"))
    }

    async fn get_system_state(&self) -> Result<Value> {
        self.pause().await;
        Ok(self.system_state.lock().unwrap().clone())
    }

    async fn get_coins(&self, _owner: &str, _coin_type: &str) -> Result<Vec<Coin>> {
        self.pause().await;
        Ok(self.coins.lock().unwrap().clone())
    }

    async fn build_transfer_sui(
        &self,
        signer: &str,
        coin_id: &str,
        gas_budget: u64,
        recipient: &str,
        amount: u64,
    ) -> Result<TransactionBlockBytes> {
        self.built_transfers.lock().unwrap().push(json!({
            "kind": "sui",
            "signer": signer,
            "coin": coin_id,
            "gasBudget": gas_budget,
            "recipient": recipient,
            "amount": amount,
        }));
        Ok(TransactionBlockBytes {
            tx_bytes: "AAECAwQ=".to_string(),
            gas: vec![],
            input_objects: vec![],
        })
    }

    async fn build_transfer_object(
        &self,
        signer: &str,
        object_id: &str,
        gas_budget: u64,
        recipient: &str,
    ) -> Result<TransactionBlockBytes> {
        self.built_transfers.lock().unwrap().push(json!({
            "kind": "object",
            "signer": signer,
            "object": object_id,
            "gasBudget": gas_budget,
            "recipient": recipient,
        }));
        Ok(TransactionBlockBytes {
            tx_bytes: "BQYHCAk=".to_string(),
            gas: vec![],
            input_objects: vec![],
        })
    }

    async fn execute_transaction(&self, tx_bytes: &str, signature: &str) -> Result<Value> {
        let response = self.executed_response();
        self.executed
            .lock()
            .unwrap()
            .push((tx_bytes.to_string(), signature.to_string()));
        Ok(response)
    }

    async fn request_faucet(&self, faucet_url: &str, recipient: &str) -> Result<Value> {
        if faucet_url.is_empty() {
            bail!("no faucet url");
        }
        self.faucet_requests
            .lock()
            .unwrap()
            .push((faucet_url.to_string(), recipient.to_string()));
        Ok(json!({ "status": "Success" }))
    }
}

/// Hands out the same [`MockChain`] for every endpoint and records the URLs.
pub struct MockConnector {
    pub chain: Arc<MockChain>,
    pub connected: Mutex<Vec<String>>,
}

impl ChainConnector for MockConnector {
    fn connect(&self, rpc_url: &str) -> Result<Arc<dyn ChainClient>> {
        self.connected.lock().unwrap().push(rpc_url.to_string());
        Ok(self.chain.clone())
    }
}

pub fn test_state_with(config: Config, chain: Arc<MockChain>) -> (AppState, Arc<MockConnector>) {
    let connector = Arc::new(MockConnector {
        chain,
        connected: Mutex::new(Vec::new()),
    });
    let state = AppState::new(config, connector.clone()).unwrap();
    (state, connector)
}

pub fn test_state(chain: Arc<MockChain>) -> AppState {
    test_state_with(Config::default(), chain).0
}

pub async fn call(state: &AppState, name: &str, arguments: Value) -> ToolResult {
    state
        .tools
        .dispatch(state.clone(), ToolRequest::new(name, arguments))
        .await
}

pub fn expect_success(result: ToolResult) -> Value {
    match result {
        ToolResult::Success(payload) => payload,
        ToolResult::Failure { kind, message } => {
            panic!("expected success, got {:?}: {}", kind, message)
        }
    }
}

pub fn expect_failure(result: ToolResult) -> (FailureKind, String) {
    match result {
        ToolResult::Failure { kind, message } => (kind, message),
        ToolResult::Success(payload) => panic!("expected failure, got {}", payload),
    }
}
