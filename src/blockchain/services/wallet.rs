use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};
use bip39::{Language, Mnemonic};
use rand::RngCore;
use secrecy::SecretString;
use tracing::info;
use zeroize::Zeroizing;

use crate::blockchain::{
    keypair::{SuiKeypair, DERIVATION_PATH, ED25519_FLAG, PRIVATE_KEY_HRP},
    models::KeyError,
};

/// Keypair plus the mnemonic it came from, if any.
pub struct GeneratedKey {
    pub keypair: SuiKeypair,
    pub mnemonic: Option<SecretString>,
}

/// Generate a fresh 12-word mnemonic and derive its first Sui account.
pub fn generate_wallet() -> Result<GeneratedKey, KeyError> {
    info!("Generating new Sui wallet");

    let mut entropy = Zeroizing::new([0u8; 16]);
    rand::thread_rng().fill_bytes(&mut entropy[..]);
    let mnemonic = Mnemonic::from_entropy_in(Language::English, &entropy[..])
        .map_err(|e| KeyError::InvalidMnemonic(e.to_string()))?;

    let keypair = keypair_from_mnemonic(&mnemonic)?;
    Ok(GeneratedKey {
        keypair,
        mnemonic: Some(SecretString::new(mnemonic.to_string())),
    })
}

/// Derive the first Sui account of a BIP-39 phrase.
pub fn import_mnemonic(phrase: &str) -> Result<GeneratedKey, KeyError> {
    let mnemonic = Mnemonic::parse_in_normalized(Language::English, phrase.trim())
        .map_err(|e| KeyError::InvalidMnemonic(e.to_string()))?;
    let keypair = keypair_from_mnemonic(&mnemonic)?;
    Ok(GeneratedKey {
        keypair,
        mnemonic: Some(SecretString::new(mnemonic.to_string())),
    })
}

fn keypair_from_mnemonic(mnemonic: &Mnemonic) -> Result<SuiKeypair, KeyError> {
    let seed = Zeroizing::new(mnemonic.to_seed(""));
    SuiKeypair::derive_from_seed(&seed[..], DERIVATION_PATH)
}

/// Parse a private key in any of the accepted encodings:
/// `suiprivkey1...`, `0x`-hex, bare 64-digit hex, or base64 of 32, 33
/// (flag + key) or 64 (secret + public) bytes.
pub fn import_private_key(input: &str) -> Result<GeneratedKey, KeyError> {
    let input = input.trim();

    if input.starts_with(PRIVATE_KEY_HRP) {
        return Ok(GeneratedKey {
            keypair: SuiKeypair::from_bech32(input)?,
            mnemonic: None,
        });
    }

    let bytes = Zeroizing::new(decode_key_bytes(input)?);
    let secret: &[u8] = match bytes.len() {
        32 => &bytes[..],
        33 if bytes[0] == ED25519_FLAG => &bytes[1..],
        64 => &bytes[..32],
        n => {
            return Err(KeyError::InvalidPrivateKey(format!(
                "expected a 32-byte ed25519 secret key, got {} bytes",
                n
            )))
        }
    };

    let mut key = Zeroizing::new([0u8; 32]);
    key.copy_from_slice(secret);
    Ok(GeneratedKey {
        keypair: SuiKeypair::from_secret_key(&key),
        mnemonic: None,
    })
}

fn decode_key_bytes(input: &str) -> Result<Vec<u8>, KeyError> {
    if let Some(hex_part) = input.strip_prefix("0x").or_else(|| input.strip_prefix("0X")) {
        return hex::decode(hex_part)
            .map_err(|_| KeyError::InvalidPrivateKey("Invalid hex format".to_string()));
    }
    // A 64-digit hex string is also valid base64, so hex wins for that shape.
    if input.len() == 64 && input.chars().all(|c| c.is_ascii_hexdigit()) {
        return hex::decode(input)
            .map_err(|_| KeyError::InvalidPrivateKey("Invalid hex format".to_string()));
    }
    BASE64
        .decode(input)
        .map_err(|_| KeyError::InvalidPrivateKey("Invalid private key format".to_string()))
}
