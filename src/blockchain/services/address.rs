use thiserror::Error;

/// Hex digits in a full-length Sui address.
pub const SUI_ADDRESS_HEX_LEN: usize = 64;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum AddressError {
    #[error("Invalid address format")]
    NotHex,
    #[error("Address is longer than 32 bytes")]
    TooLong,
}

fn strip_hex_prefix(address: &str) -> &str {
    address
        .strip_prefix("0x")
        .or_else(|| address.strip_prefix("0X"))
        .unwrap_or(address)
}

/// True for an optionally `0x`-prefixed, even-length hex string of exactly
/// 32 bytes.
pub fn is_valid_sui_address(address: &str) -> bool {
    let digits = strip_hex_prefix(address);
    digits.len() == SUI_ADDRESS_HEX_LEN && digits.chars().all(|c| c.is_ascii_hexdigit())
}

/// Lowercases, drops the `0x` prefix and left-pads to 64 hex digits.
pub fn normalize_sui_address(address: &str) -> Result<String, AddressError> {
    let digits = strip_hex_prefix(address.trim());
    if digits.is_empty() || !digits.chars().all(|c| c.is_ascii_hexdigit()) {
        return Err(AddressError::NotHex);
    }
    if digits.len() > SUI_ADDRESS_HEX_LEN {
        return Err(AddressError::TooLong);
    }
    Ok(format!(
        "0x{:0>width$}",
        digits.to_ascii_lowercase(),
        width = SUI_ADDRESS_HEX_LEN
    ))
}
