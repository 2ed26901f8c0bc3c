//! Tool implementations, one async fn per cataloged tool.

pub mod balance;
pub mod network;
pub mod transaction;
pub mod utility;
pub mod validator;
pub mod wallet;

use crate::tools::registry::{handler, Handler};

/// Every handler paired with the tool name it serves.
pub fn all() -> Vec<(&'static str, Handler)> {
    vec![
        ("create_wallet", handler(wallet::create_wallet)),
        ("import_wallet", handler(wallet::import_wallet)),
        ("list_wallets", handler(wallet::list_wallets)),
        ("get_wallet_address", handler(wallet::get_wallet_address)),
        ("export_wallet", handler(wallet::export_wallet)),
        ("get_balance", handler(balance::get_balance)),
        ("get_all_balances", handler(balance::get_all_balances)),
        ("get_objects", handler(balance::get_objects)),
        ("get_object_details", handler(balance::get_object_details)),
        ("transfer_sui", handler(transaction::transfer_sui)),
        ("transfer_object", handler(transaction::transfer_object)),
        ("get_transaction", handler(transaction::get_transaction)),
        ("get_transactions", handler(transaction::get_transactions)),
        (
            "get_wallet_transactions",
            handler(transaction::get_wallet_transactions),
        ),
        ("get_gas_price", handler(transaction::get_gas_price)),
        (
            "request_tokens_from_faucet",
            handler(network::request_tokens_from_faucet),
        ),
        ("switch_network", handler(network::switch_network)),
        ("get_network_info", handler(network::get_network_info)),
        ("get_chain_id", handler(network::get_chain_id)),
        ("get_validators", handler(validator::get_validators)),
        ("get_validator_info", handler(validator::get_validator_info)),
        ("validate_address", handler(utility::validate_address)),
        ("normalize_address", handler(utility::normalize_address)),
        ("convert_mist_to_sui", handler(utility::convert_mist_to_sui)),
        ("convert_sui_to_mist", handler(utility::convert_sui_to_mist)),
    ]
}
