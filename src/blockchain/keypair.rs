//! Ed25519 keypairs for Sui accounts.
//!
//! Covers SLIP-0010 hardened derivation from a BIP-39 seed, Sui address
//! encoding, the `suiprivkey` Bech32 export format, and signing of
//! transaction bytes with the Sui intent prefix.

use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};
use bech32::{FromBase32, ToBase32, Variant};
use blake2::{digest::consts::U32, Blake2b, Digest};
use ed25519_dalek::{Signer, SigningKey};
use hmac::{Hmac, Mac};
use sha2::Sha512;
use zeroize::Zeroizing;

use crate::blockchain::models::KeyError;

type HmacSha512 = Hmac<Sha512>;
type Blake2b256 = Blake2b<U32>;

/// Signature scheme flag for ed25519 in Sui addresses and signatures.
pub const ED25519_FLAG: u8 = 0x00;
/// Bech32 human readable part of exported private keys.
pub const PRIVATE_KEY_HRP: &str = "suiprivkey";
/// Default derivation path used by Sui wallets for ed25519 keys.
pub const DERIVATION_PATH: &str = "m/44'/784'/0'/0'/0'";

const HARDENED_OFFSET: u32 = 0x8000_0000;
const SLIP10_CURVE_KEY: &[u8] = b"ed25519 seed";
/// TransactionData intent: scope 0, version 0, app id Sui.
const TRANSACTION_INTENT: [u8; 3] = [0, 0, 0];

/// An ed25519 keypair controlling a Sui address.
#[derive(Clone)]
pub struct SuiKeypair {
    signing_key: SigningKey,
}

impl std::fmt::Debug for SuiKeypair {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SuiKeypair")
            .field("address", &self.address())
            .finish_non_exhaustive()
    }
}

impl SuiKeypair {
    pub fn from_secret_key(secret: &[u8; 32]) -> Self {
        Self {
            signing_key: SigningKey::from_bytes(secret),
        }
    }

    /// Derives the keypair at `path` from a BIP-39 seed.
    pub fn derive_from_seed(seed: &[u8], path: &str) -> Result<Self, KeyError> {
        let secret = derive_slip10_ed25519(seed, path)?;
        Ok(Self::from_secret_key(&secret))
    }

    pub fn public_key_bytes(&self) -> [u8; 32] {
        self.signing_key.verifying_key().to_bytes()
    }

    pub fn public_key_base64(&self) -> String {
        BASE64.encode(self.public_key_bytes())
    }

    /// `0x` + hex(BLAKE2b-256(flag || public key))
    pub fn address(&self) -> String {
        let mut hasher = Blake2b256::new();
        hasher.update([ED25519_FLAG]);
        hasher.update(self.public_key_bytes());
        format!("0x{}", hex::encode(hasher.finalize()))
    }

    pub fn secret_key_hex(&self) -> Zeroizing<String> {
        Zeroizing::new(format!("0x{}", hex::encode(self.signing_key.to_bytes())))
    }

    /// Encodes the secret as `suiprivkey1...` (flag byte followed by the key).
    pub fn to_bech32(&self) -> Result<Zeroizing<String>, KeyError> {
        let mut payload = Zeroizing::new(Vec::with_capacity(33));
        payload.push(ED25519_FLAG);
        payload.extend_from_slice(&self.signing_key.to_bytes());
        bech32::encode(PRIVATE_KEY_HRP, payload.to_base32(), Variant::Bech32)
            .map(Zeroizing::new)
            .map_err(|e| KeyError::InvalidPrivateKey(e.to_string()))
    }

    /// Decodes a `suiprivkey1...` string.
    pub fn from_bech32(encoded: &str) -> Result<Self, KeyError> {
        let (hrp, data, _variant) = bech32::decode(encoded)
            .map_err(|e| KeyError::InvalidPrivateKey(format!("bech32: {}", e)))?;
        if hrp != PRIVATE_KEY_HRP {
            return Err(KeyError::InvalidPrivateKey(format!(
                "unexpected prefix '{}'",
                hrp
            )));
        }
        let bytes = Zeroizing::new(
            Vec::<u8>::from_base32(&data)
                .map_err(|e| KeyError::InvalidPrivateKey(format!("bech32: {}", e)))?,
        );
        match bytes.split_first() {
            Some((&ED25519_FLAG, secret)) if secret.len() == 32 => {
                let mut key = Zeroizing::new([0u8; 32]);
                key.copy_from_slice(secret);
                Ok(Self::from_secret_key(&key))
            }
            Some((&flag, _)) if flag != ED25519_FLAG => Err(KeyError::InvalidPrivateKey(
                format!("unsupported key scheme flag {}", flag),
            )),
            _ => Err(KeyError::InvalidPrivateKey(
                "expected 33 bytes (flag + 32-byte key)".to_string(),
            )),
        }
    }

    /// Signs base64 transaction bytes and returns the serialized Sui
    /// signature, base64(flag || signature || public key).
    pub fn sign_transaction(&self, tx_bytes_b64: &str) -> Result<String, KeyError> {
        let tx_bytes = BASE64
            .decode(tx_bytes_b64)
            .map_err(|e| KeyError::Signing(format!("transaction bytes are not base64: {}", e)))?;

        let mut hasher = Blake2b256::new();
        hasher.update(TRANSACTION_INTENT);
        hasher.update(&tx_bytes);
        let digest = hasher.finalize();

        let signature = self.signing_key.sign(&digest);
        let mut serialized = Vec::with_capacity(1 + 64 + 32);
        serialized.push(ED25519_FLAG);
        serialized.extend_from_slice(&signature.to_bytes());
        serialized.extend_from_slice(&self.public_key_bytes());
        Ok(BASE64.encode(serialized))
    }
}

/// Parses a path like `m/44'/784'/0'/0'/0'`. ed25519 under SLIP-0010 only
/// supports hardened children, so every segment must end in `'`.
fn parse_hardened_path(path: &str) -> Result<Vec<u32>, KeyError> {
    let mut segments = path.split('/');
    if segments.next() != Some("m") {
        return Err(KeyError::Derivation(format!(
            "path '{}' must start with 'm'",
            path
        )));
    }
    segments
        .map(|segment| {
            let index = segment
                .strip_suffix('\'')
                .ok_or_else(|| {
                    KeyError::Derivation(format!("segment '{}' is not hardened", segment))
                })?
                .parse::<u32>()
                .map_err(|_| KeyError::Derivation(format!("invalid segment '{}'", segment)))?;
            if index >= HARDENED_OFFSET {
                return Err(KeyError::Derivation(format!(
                    "segment '{}' out of range",
                    segment
                )));
            }
            Ok(index + HARDENED_OFFSET)
        })
        .collect()
}

fn hmac_sha512(key: &[u8], data: &[u8]) -> Result<Zeroizing<[u8; 64]>, KeyError> {
    let mut mac = HmacSha512::new_from_slice(key)
        .map_err(|e| KeyError::Derivation(e.to_string()))?;
    mac.update(data);
    let mut out = Zeroizing::new([0u8; 64]);
    out.copy_from_slice(&mac.finalize().into_bytes());
    Ok(out)
}

/// SLIP-0010 ed25519 derivation. Returns the 32-byte secret at `path`.
pub fn derive_slip10_ed25519(seed: &[u8], path: &str) -> Result<Zeroizing<[u8; 32]>, KeyError> {
    let indexes = parse_hardened_path(path)?;

    let mut node = hmac_sha512(SLIP10_CURVE_KEY, seed)?;
    for index in indexes {
        let mut data = Zeroizing::new(Vec::with_capacity(37));
        data.push(0u8);
        data.extend_from_slice(&node[..32]);
        data.extend_from_slice(&index.to_be_bytes());
        node = hmac_sha512(&node[32..], &data)?;
    }

    let mut secret = Zeroizing::new([0u8; 32]);
    secret.copy_from_slice(&node[..32]);
    Ok(secret)
}
