use anyhow::{Context, Result};
use serde::Deserialize;
use serde_json::Value;

use crate::{blockchain::services::validators, utils::parse_args, AppState};

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ValidatorArgs {
    validator_address: String,
}

pub async fn get_validators(state: AppState, _args: Value) -> Result<Value> {
    let active = state.network.snapshot();
    let system_state = active
        .client
        .get_system_state()
        .await
        .context("Failed to fetch system state")?;
    Ok(validators::validator_list(&system_state))
}

pub async fn get_validator_info(state: AppState, args: Value) -> Result<Value> {
    let args: ValidatorArgs = parse_args(args)?;
    let active = state.network.snapshot();
    let system_state = active
        .client
        .get_system_state()
        .await
        .context("Failed to fetch system state")?;
    validators::find_validator(&system_state, &args.validator_address)
}
