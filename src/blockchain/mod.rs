// src/blockchain/mod.rs

pub mod client;
pub mod keypair;
pub mod models;
pub mod network;
pub mod services;
pub mod wallet_manager;

// Re-export commonly used types
pub use client::{ChainClient, ChainConnector, SuiRpcClient, SuiRpcConnector};
pub use keypair::SuiKeypair;
pub use network::{Network, NetworkState};
pub use wallet_manager::WalletManager;
