use serde_json::{json, Value};

use crate::blockchain::{
    models::Balance,
    services::{transactions::SUI_COIN_TYPE, units},
};

fn sui_amount(total_balance: &str) -> Option<f64> {
    total_balance.parse::<u64>().ok().map(units::mist_to_sui)
}

/// Shape of a single coin-type balance; `sui` is only set for SUI itself.
pub fn describe_balance(balance: &Balance) -> Value {
    let mut described = json!({
        "coinType": balance.coin_type,
        "totalBalance": balance.total_balance,
        "coinObjectCount": balance.coin_object_count,
    });
    if balance.coin_type == SUI_COIN_TYPE {
        if let Some(sui) = sui_amount(&balance.total_balance) {
            described["sui"] = json!(sui);
        }
    }
    described
}

/// Balance summary returned by `get_balance`.
pub fn balance_summary(balance: &Balance) -> Value {
    json!({
        "totalBalance": balance.total_balance,
        "sui": sui_amount(&balance.total_balance),
        "coinObjectCount": balance.coin_object_count,
    })
}
