//! In-memory wallet set for the lifetime of the process.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use dashmap::{mapref::entry::Entry, DashMap};
use secrecy::{ExposeSecret, SecretString};
use tracing::{info, warn};

use crate::blockchain::{
    keypair::SuiKeypair,
    models::{ExportedWallet, WalletError, WalletOrigin, WalletResponse, WalletSummary},
    services::wallet::{self, GeneratedKey},
};

/// A wallet held by the server. Key material is zeroized on drop.
pub struct StoredWallet {
    pub name: String,
    pub keypair: SuiKeypair,
    pub address: String,
    pub mnemonic: Option<SecretString>,
    pub origin: WalletOrigin,
    pub created_at: DateTime<Utc>,
    seq: u64,
}

/// Named wallets keyed by name. Cloning shares the underlying set.
#[derive(Clone, Default)]
pub struct WalletManager {
    wallets: Arc<DashMap<String, Arc<StoredWallet>>>,
    seq: Arc<AtomicU64>,
}

impl WalletManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Generate a new wallet and store it under `name`.
    pub fn create_wallet(&self, name: &str) -> Result<WalletResponse> {
        self.ensure_available(name)?;
        let generated = wallet::generate_wallet()?;
        let mnemonic = generated
            .mnemonic
            .as_ref()
            .map(|m| m.expose_secret().clone());

        let stored = self.insert(name, generated, WalletOrigin::Created)?;
        info!("Created wallet '{}' ({})", stored.name, stored.address);

        Ok(WalletResponse {
            name: stored.name.clone(),
            address: stored.address.clone(),
            mnemonic,
        })
    }

    /// Import a wallet from a mnemonic or a private key. The mnemonic wins
    /// when both are given.
    pub fn import_wallet(
        &self,
        name: &str,
        mnemonic: Option<&str>,
        private_key: Option<&str>,
    ) -> Result<WalletResponse> {
        self.ensure_available(name)?;

        let mnemonic = mnemonic.filter(|m| !m.trim().is_empty());
        let private_key = private_key.filter(|k| !k.trim().is_empty());

        let (generated, origin) = match (mnemonic, private_key) {
            (Some(phrase), other) => {
                if other.is_some() {
                    warn!(
                        "Both mnemonic and privateKey supplied for '{}'; using the mnemonic",
                        name
                    );
                }
                let generated =
                    wallet::import_mnemonic(phrase).context("Failed to import wallet")?;
                (generated, WalletOrigin::Mnemonic)
            }
            (None, Some(key)) => {
                let generated =
                    wallet::import_private_key(key).context("Failed to import wallet")?;
                (generated, WalletOrigin::PrivateKey)
            }
            (None, None) => anyhow::bail!(
                "Failed to import wallet: Either mnemonic or privateKey must be provided"
            ),
        };

        let stored = self.insert(name, generated, origin)?;
        info!("Imported wallet '{}' ({})", stored.name, stored.address);

        Ok(WalletResponse {
            name: stored.name.clone(),
            address: stored.address.clone(),
            mnemonic: None,
        })
    }

    fn ensure_available(&self, name: &str) -> Result<(), WalletError> {
        if name.trim().is_empty() {
            return Err(WalletError::EmptyName);
        }
        if self.wallets.contains_key(name) {
            return Err(WalletError::AlreadyExists(name.to_string()));
        }
        Ok(())
    }

    /// Atomically stores a wallet; an existing entry under `name` is a conflict.
    pub fn insert(
        &self,
        name: &str,
        generated: GeneratedKey,
        origin: WalletOrigin,
    ) -> Result<Arc<StoredWallet>, WalletError> {
        if name.trim().is_empty() {
            return Err(WalletError::EmptyName);
        }
        match self.wallets.entry(name.to_string()) {
            Entry::Occupied(_) => Err(WalletError::AlreadyExists(name.to_string())),
            Entry::Vacant(slot) => {
                let stored = Arc::new(StoredWallet {
                    name: name.to_string(),
                    address: generated.keypair.address(),
                    keypair: generated.keypair,
                    mnemonic: generated.mnemonic,
                    origin,
                    created_at: Utc::now(),
                    seq: self.seq.fetch_add(1, Ordering::Relaxed),
                });
                slot.insert(stored.clone());
                Ok(stored)
            }
        }
    }

    pub fn get(&self, name: &str) -> Result<Arc<StoredWallet>, WalletError> {
        self.wallets
            .get(name)
            .map(|entry| entry.value().clone())
            .ok_or_else(|| WalletError::NotFound(name.to_string()))
    }

    pub fn contains(&self, name: &str) -> bool {
        self.wallets.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.wallets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.wallets.is_empty()
    }

    /// All wallets in creation order.
    pub fn list(&self) -> Vec<WalletSummary> {
        let mut wallets: Vec<Arc<StoredWallet>> =
            self.wallets.iter().map(|entry| entry.value().clone()).collect();
        wallets.sort_by_key(|w| w.seq);
        wallets
            .iter()
            .map(|w| WalletSummary {
                name: w.name.clone(),
                address: w.address.clone(),
            })
            .collect()
    }

    /// Full key material for `name`.
    pub fn export(&self, name: &str) -> Result<ExportedWallet> {
        let stored = self.get(name)?;
        warn!("Exporting key material for wallet '{}'", name);
        Ok(ExportedWallet {
            name: stored.name.clone(),
            address: stored.address.clone(),
            public_key: stored.keypair.public_key_base64(),
            private_key: stored.keypair.to_bech32()?.to_string(),
            private_key_hex: stored.keypair.secret_key_hex().to_string(),
            mnemonic: stored
                .mnemonic
                .as_ref()
                .map(|m| m.expose_secret().clone()),
            origin: stored.origin,
            created_at: stored.created_at,
        })
    }
}
