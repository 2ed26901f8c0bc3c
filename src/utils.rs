//! Utility functions for the Sui MCP server

use anyhow::{bail, Context, Result};
use serde::de::DeserializeOwned;
use serde_json::{from_value, Value};

/// Deserializes validated tool arguments into a typed struct.
pub fn parse_args<T: DeserializeOwned>(args: Value) -> Result<T> {
    from_value(args).context("Missing or invalid arguments")
}

/// Interprets an optional numeric `limit` argument as a whole page size in
/// `1..=max`, defaulting when absent.
pub fn page_limit(limit: Option<f64>, default: u64, max: u64) -> Result<u64> {
    match limit {
        None => Ok(default),
        Some(value) if !value.is_finite() || value < 1.0 => {
            bail!("limit must be a positive number, got {}", value)
        }
        Some(value) => Ok((value.floor() as u64).min(max)),
    }
}
