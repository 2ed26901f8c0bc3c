// src/blockchain/models.rs
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

// --- Error types for key and wallet operations ---

#[derive(Error, Debug)]
pub enum KeyError {
    #[error("invalid mnemonic: {0}")]
    InvalidMnemonic(String),
    #[error("invalid private key: {0}")]
    InvalidPrivateKey(String),
    #[error("key derivation failed: {0}")]
    Derivation(String),
    #[error("signing failed: {0}")]
    Signing(String),
}

#[derive(Error, Debug, PartialEq, Eq)]
pub enum WalletError {
    #[error("Wallet with name '{0}' already exists")]
    AlreadyExists(String),
    #[error("Wallet '{0}' not found")]
    NotFound(String),
    #[error("Wallet name cannot be empty")]
    EmptyName,
}

// --- Wallet Models ---

/// How a stored wallet came into being.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum WalletOrigin {
    Created,
    Mnemonic,
    PrivateKey,
}

/// Response for wallet creation and import
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct WalletResponse {
    /// The wallet name
    pub name: String,
    /// The Sui address of the wallet (0x-prefixed, 64 hex digits)
    pub address: String,
    /// The mnemonic phrase (only included on wallet creation)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mnemonic: Option<String>,
}

/// Name and address pair used when listing wallets.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct WalletSummary {
    pub name: String,
    pub address: String,
}

/// Full key material of a wallet, returned by `export_wallet`.
#[derive(Debug, Serialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct ExportedWallet {
    pub name: String,
    pub address: String,
    /// Base64 ed25519 public key
    pub public_key: String,
    /// Bech32 `suiprivkey1...` encoding
    pub private_key: String,
    /// 0x-prefixed hex of the 32-byte secret
    pub private_key_hex: String,
    pub mnemonic: Option<String>,
    pub origin: WalletOrigin,
    pub created_at: DateTime<Utc>,
}

// --- Chain Models ---

/// Balance of one coin type, as returned by `suix_getBalance`.
#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct Balance {
    pub coin_type: String,
    pub coin_object_count: u64,
    pub total_balance: String,
}

/// A single coin object, as returned by `suix_getCoins`.
#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct Coin {
    pub coin_type: String,
    pub coin_object_id: String,
    #[serde(default)]
    pub version: String,
    #[serde(default)]
    pub digest: String,
    pub balance: String,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct CoinPage {
    pub data: Vec<Coin>,
    #[serde(default)]
    pub next_cursor: Option<String>,
    #[serde(default)]
    pub has_next_page: bool,
}

/// Unsigned transaction built by a full node (`unsafe_*` methods).
#[derive(Debug, Deserialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct TransactionBlockBytes {
    /// Base64 BCS bytes of the transaction data
    pub tx_bytes: String,
    #[serde(default)]
    pub gas: Vec<Value>,
    #[serde(default)]
    pub input_objects: Vec<Value>,
}

/// Result of a submitted transfer.
#[derive(Debug, Serialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct TransferResponse {
    pub success: bool,
    pub digest: String,
    pub from: String,
    pub to: String,
    pub status: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub amount: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mist: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub object_id: Option<String>,
}

impl TransferResponse {
    /// Reads digest and execution status out of a
    /// `sui_executeTransactionBlock` response.
    pub fn from_execution(from: &str, to: &str, response: &Value) -> Self {
        let digest = response
            .get("digest")
            .and_then(|v| v.as_str())
            .unwrap_or_default()
            .to_string();
        let status = response
            .pointer("/effects/status/status")
            .and_then(|v| v.as_str())
            .unwrap_or("unknown")
            .to_string();
        let error = response
            .pointer("/effects/status/error")
            .and_then(|v| v.as_str())
            .map(str::to_string);
        Self {
            success: status == "success",
            digest,
            from: from.to_string(),
            to: to.to_string(),
            status,
            error,
            amount: None,
            mist: None,
            object_id: None,
        }
    }
}
