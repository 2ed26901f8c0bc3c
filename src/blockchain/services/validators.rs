use anyhow::{anyhow, Result};
use serde_json::{json, Value};

use crate::blockchain::services::address::normalize_sui_address;

fn active_validators(system_state: &Value) -> &[Value] {
    system_state
        .get("activeValidators")
        .and_then(Value::as_array)
        .map(Vec::as_slice)
        .unwrap_or_default()
}

fn summarize(validator: &Value) -> Value {
    json!({
        "suiAddress": validator.get("suiAddress"),
        "name": validator.get("name"),
        "votingPower": validator.get("votingPower"),
        "commissionRate": validator.get("commissionRate"),
        "gasPrice": validator.get("gasPrice"),
        "stakingPoolSuiBalance": validator.get("stakingPoolSuiBalance"),
    })
}

/// Epoch plus a summary row per active validator.
pub fn validator_list(system_state: &Value) -> Value {
    let validators: Vec<Value> = active_validators(system_state).iter().map(summarize).collect();
    json!({
        "epoch": system_state.get("epoch"),
        "count": validators.len(),
        "validators": validators,
    })
}

/// Full record of the active validator at `address`.
pub fn find_validator(system_state: &Value, address: &str) -> Result<Value> {
    let wanted = normalize_sui_address(address).ok();
    active_validators(system_state)
        .iter()
        .find(|v| {
            let candidate = v
                .get("suiAddress")
                .and_then(Value::as_str)
                .and_then(|a| normalize_sui_address(a).ok());
            wanted.is_some() && candidate == wanted
        })
        .cloned()
        .ok_or_else(|| anyhow!("Validator '{}' not found", address))
}
