// src/tools/handlers/utility.rs

use anyhow::Result;
use serde::Deserialize;
use serde_json::{json, Number, Value};

use crate::{
    blockchain::services::{
        address::{is_valid_sui_address, normalize_sui_address},
        units,
    },
    utils::parse_args,
    AppState,
};

#[derive(Deserialize)]
struct AddressArgs {
    address: String,
}

#[derive(Deserialize)]
struct MistArgs {
    mist: String,
}

#[derive(Deserialize)]
struct SuiArgs {
    sui: Number,
}

pub async fn validate_address(_state: AppState, args: Value) -> Result<Value> {
    let args: AddressArgs = parse_args(args)?;
    let valid = is_valid_sui_address(&args.address);
    let normalized = if valid {
        normalize_sui_address(&args.address).ok()
    } else {
        None
    };
    let message = if valid {
        "Valid Sui address"
    } else {
        "Invalid Sui address"
    };
    Ok(json!({
        "address": args.address,
        "valid": valid,
        "normalized": normalized,
        "message": message,
    }))
}

pub async fn normalize_address(_state: AppState, args: Value) -> Result<Value> {
    let args: AddressArgs = parse_args(args)?;
    Ok(match normalize_sui_address(&args.address) {
        Ok(normalized) => json!({
            "original": args.address,
            "normalized": normalized,
            "valid": true,
        }),
        Err(e) => json!({
            "original": args.address,
            "normalized": null,
            "valid": false,
            "error": e.to_string(),
        }),
    })
}

pub async fn convert_mist_to_sui(_state: AppState, args: Value) -> Result<Value> {
    let args: MistArgs = parse_args(args)?;
    let mist = units::parse_mist(&args.mist)?;
    Ok(json!({
        "mist": args.mist,
        "sui": units::mist_to_sui(mist),
        "formatted": format!("{} SUI", units::format_sui(mist)),
    }))
}

pub async fn convert_sui_to_mist(_state: AppState, args: Value) -> Result<Value> {
    let args: SuiArgs = parse_args(args)?;
    let mist = units::sui_to_mist(&args.sui.to_string())?;
    Ok(json!({
        "sui": args.sui,
        "mist": mist.to_string(),
        "formatted": format!("{} MIST", mist),
    }))
}
