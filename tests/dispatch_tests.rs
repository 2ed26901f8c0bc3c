// tests/dispatch_tests.rs

mod common;

use std::sync::Arc;
use std::time::Duration;

use base64::{engine::general_purpose::STANDARD as BASE64, Engine};
use serde_json::json;
use sui_mcp_server::{config::Config, tools::FailureKind};
use tokio::time::Instant;

use common::{call, expect_failure, expect_success, test_state, test_state_with, MockChain};

const TEST_MNEMONIC: &str =
    "abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon about";
const RECIPIENT: &str = "0x00000000000000000000000000000000000000000000000000000000000000b0";

#[tokio::test]
async fn test_unknown_tool_reports_not_found() {
    let chain = MockChain::new();
    let state = test_state(chain.clone());

    let (kind, message) = expect_failure(call(&state, "mint_nft", json!({})).await);
    assert_eq!(kind, FailureKind::ToolNotFound);
    assert_eq!(message, "unknown tool mint_nft");
    assert!(chain.built_transfers.lock().unwrap().is_empty());
}

#[tokio::test]
async fn test_missing_required_field_fails_validation_without_side_effects() {
    let state = test_state(MockChain::new());

    let (kind, message) = expect_failure(call(&state, "create_wallet", json!({})).await);
    assert_eq!(kind, FailureKind::ValidationFailure);
    assert!(message.contains("name"), "{}", message);
    assert!(state.wallets.is_empty());

    let (kind, _) = expect_failure(call(&state, "create_wallet", json!({ "name": 5 })).await);
    assert_eq!(kind, FailureKind::ValidationFailure);
    assert!(state.wallets.is_empty());
}

#[tokio::test]
async fn test_null_arguments_are_treated_as_empty_object() {
    let state = test_state(MockChain::new());
    let payload = expect_success(call(&state, "list_wallets", serde_json::Value::Null).await);
    assert_eq!(payload["count"], 0);
}

#[tokio::test]
async fn test_create_list_address_and_export() {
    let state = test_state(MockChain::new());

    let created = expect_success(call(&state, "create_wallet", json!({ "name": "alice" })).await);
    assert_eq!(created["success"], true);
    let address = created["wallet"]["address"].as_str().unwrap().to_string();
    assert_eq!(address.len(), 66);
    let words = created["wallet"]["mnemonic"].as_str().unwrap().split(' ').count();
    assert_eq!(words, 12);

    expect_success(call(&state, "create_wallet", json!({ "name": "bob" })).await);
    let listed = expect_success(call(&state, "list_wallets", json!({})).await);
    assert_eq!(listed["count"], 2);
    assert_eq!(listed["wallets"][0]["name"], "alice");
    assert_eq!(listed["wallets"][1]["name"], "bob");

    let found =
        expect_success(call(&state, "get_wallet_address", json!({ "walletName": "alice" })).await);
    assert_eq!(found["address"], address.as_str());

    let exported =
        expect_success(call(&state, "export_wallet", json!({ "walletName": "alice" })).await);
    assert_eq!(exported["address"], address.as_str());
    assert!(exported["privateKey"].as_str().unwrap().starts_with("suiprivkey1"));
    assert_eq!(exported["mnemonic"], created["wallet"]["mnemonic"]);
}

#[tokio::test]
async fn test_duplicate_and_missing_wallets_are_handler_failures() {
    let state = test_state(MockChain::new());
    expect_success(call(&state, "create_wallet", json!({ "name": "alice" })).await);

    let (kind, message) =
        expect_failure(call(&state, "create_wallet", json!({ "name": "alice" })).await);
    assert_eq!(kind, FailureKind::HandlerFailure);
    assert_eq!(message, "Wallet with name 'alice' already exists");

    let (kind, message) =
        expect_failure(call(&state, "get_wallet_address", json!({ "walletName": "carol" })).await);
    assert_eq!(kind, FailureKind::HandlerFailure);
    assert_eq!(message, "Wallet 'carol' not found");
}

#[tokio::test]
async fn test_concurrent_creates_with_same_name_admit_one() {
    let state = test_state(MockChain::new());
    let args = json!({ "name": "shared" });

    let (first, second) = tokio::join!(
        call(&state, "create_wallet", args.clone()),
        call(&state, "create_wallet", args.clone())
    );
    assert_eq!(
        [first.is_success(), second.is_success()].iter().filter(|ok| **ok).count(),
        1
    );
    assert_eq!(state.wallets.len(), 1);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_parallel_creates_across_threads_admit_one() {
    let state = test_state(MockChain::new());

    let tasks: Vec<_> = (0..8)
        .map(|_| {
            let state = state.clone();
            tokio::spawn(async move {
                call(&state, "create_wallet", json!({ "name": "race" })).await
            })
        })
        .collect();

    let mut successes = 0;
    for task in tasks {
        if task.await.unwrap().is_success() {
            successes += 1;
        }
    }
    assert_eq!(successes, 1);
    assert_eq!(state.wallets.len(), 1);
}

#[tokio::test]
async fn test_import_prefers_mnemonic_over_private_key() {
    let state = test_state(MockChain::new());

    let from_phrase = expect_success(
        call(&state, "import_wallet", json!({ "name": "phrase", "mnemonic": TEST_MNEMONIC })).await,
    );
    expect_success(call(&state, "create_wallet", json!({ "name": "other" })).await);
    let other = expect_success(call(&state, "export_wallet", json!({ "walletName": "other" })).await);

    let both = expect_success(
        call(
            &state,
            "import_wallet",
            json!({
                "name": "both",
                "mnemonic": TEST_MNEMONIC,
                "privateKey": other["privateKey"],
            }),
        )
        .await,
    );
    assert_eq!(both["wallet"]["address"], from_phrase["wallet"]["address"]);
    assert!(both["wallet"].get("mnemonic").is_none());

    let from_key = expect_success(
        call(
            &state,
            "import_wallet",
            json!({ "name": "key", "privateKey": other["privateKeyHex"] }),
        )
        .await,
    );
    assert_eq!(from_key["wallet"]["address"], other["address"]);
}

#[tokio::test]
async fn test_import_without_secret_fails() {
    let state = test_state(MockChain::new());
    let (kind, message) = expect_failure(
        call(&state, "import_wallet", json!({ "name": "empty", "mnemonic": "" })).await,
    );
    assert_eq!(kind, FailureKind::HandlerFailure);
    assert!(message.contains("Either mnemonic or privateKey must be provided"));
    assert!(state.wallets.is_empty());
}

#[tokio::test]
async fn test_unit_conversions() {
    let state = test_state(MockChain::new());

    let sui = expect_success(
        call(&state, "convert_mist_to_sui", json!({ "mist": "1000000000" })).await,
    );
    assert_eq!(sui["sui"], 1.0);
    assert_eq!(sui["formatted"], "1.000000000 SUI");

    let half = expect_success(call(&state, "convert_sui_to_mist", json!({ "sui": 0.5 })).await);
    assert_eq!(half["mist"], "500000000");

    let tiny = expect_success(call(&state, "convert_sui_to_mist", json!({ "sui": 1.9e-9 })).await);
    assert_eq!(tiny["mist"], "1");

    let (kind, _) =
        expect_failure(call(&state, "convert_sui_to_mist", json!({ "sui": -1 })).await);
    assert_eq!(kind, FailureKind::HandlerFailure);

    let (kind, _) =
        expect_failure(call(&state, "convert_mist_to_sui", json!({ "mist": 1000 })).await);
    assert_eq!(kind, FailureKind::ValidationFailure);
}

#[tokio::test]
async fn test_address_tools() {
    let state = test_state(MockChain::new());

    let valid = expect_success(call(&state, "validate_address", json!({ "address": RECIPIENT })).await);
    assert_eq!(valid["valid"], true);

    let short = expect_success(call(&state, "validate_address", json!({ "address": "0x2" })).await);
    assert_eq!(short["valid"], false);

    let normalized =
        expect_success(call(&state, "normalize_address", json!({ "address": "0x2" })).await);
    assert_eq!(
        normalized["normalized"],
        "0x0000000000000000000000000000000000000000000000000000000000000002"
    );

    let bad = expect_success(call(&state, "normalize_address", json!({ "address": "0xzz" })).await);
    assert_eq!(bad["valid"], false);
}

#[tokio::test]
async fn test_switch_network_reports_previous_and_reconnects() {
    let mut config = Config::default();
    config.rpc_urls.insert(
        sui_mcp_server::blockchain::network::Network::Testnet,
        "http://testnet.local:9000".to_string(),
    );
    let (state, connector) = test_state_with(config, MockChain::new());

    let switched =
        expect_success(call(&state, "switch_network", json!({ "network": "testnet" })).await);
    assert_eq!(switched["previousNetwork"], "devnet");
    assert_eq!(switched["currentNetwork"], "testnet");
    assert_eq!(switched["rpcUrl"], "http://testnet.local:9000");

    let connected = connector.connected.lock().unwrap().clone();
    assert_eq!(
        connected,
        vec![
            "https://fullnode.devnet.sui.io:443".to_string(),
            "http://testnet.local:9000".to_string()
        ]
    );

    let (kind, _) =
        expect_failure(call(&state, "switch_network", json!({ "network": "betanet" })).await);
    assert_eq!(kind, FailureKind::ValidationFailure);
    assert_eq!(state.network.current().to_string(), "testnet");
}

#[tokio::test]
async fn test_network_info_falls_back_when_chain_id_fails() {
    let chain = MockChain::new();
    let state = test_state(chain.clone());

    let info = expect_success(call(&state, "get_network_info", json!({})).await);
    assert_eq!(info["chainId"], "4c78adac");

    *chain.chain_id.lock().unwrap() = None;
    let info = expect_success(call(&state, "get_network_info", json!({})).await);
    assert_eq!(info["network"], "devnet");
    assert_eq!(info["error"], "Failed to fetch network details");

    let (kind, message) = expect_failure(call(&state, "get_chain_id", json!({})).await);
    assert_eq!(kind, FailureKind::HandlerFailure);
    assert!(message.contains("connection refused"));
}

#[tokio::test(start_paused = true)]
async fn test_slow_handler_times_out() {
    let chain = MockChain::new();
    *chain.delay.lock().unwrap() = Some(Duration::from_secs(30));
    let config = Config {
        tool_timeout: Duration::from_millis(100),
        ..Config::default()
    };
    let (state, _) = test_state_with(config, chain);

    let (kind, message) = expect_failure(call(&state, "get_gas_price", json!({})).await);
    assert_eq!(kind, FailureKind::TimeoutFailure);
    assert_eq!(message, "operation timed out");
}

#[tokio::test(start_paused = true)]
async fn test_timeout_does_not_block_other_calls() {
    let chain = MockChain::new();
    *chain.delay.lock().unwrap() = Some(Duration::from_secs(30));
    let config = Config {
        tool_timeout: Duration::from_millis(100),
        ..Config::default()
    };
    let (state, _) = test_state_with(config, chain);

    let started = Instant::now();
    let (slow, fast) = tokio::join!(call(&state, "get_gas_price", json!({})), async {
        let result = call(&state, "list_wallets", json!({})).await;
        (result, started.elapsed())
    });

    let (kind, _) = expect_failure(slow);
    assert_eq!(kind, FailureKind::TimeoutFailure);
    let (listed, waited) = fast;
    assert_eq!(expect_success(listed)["count"], 0);
    assert_eq!(waited, Duration::ZERO);
}

#[tokio::test(start_paused = true)]
async fn test_timed_out_transfer_never_reaches_chain() {
    let chain = MockChain::new();
    let config = Config {
        tool_timeout: Duration::from_millis(100),
        ..Config::default()
    };
    let (state, _) = test_state_with(config, chain.clone());
    expect_success(call(&state, "create_wallet", json!({ "name": "alice" })).await);
    chain.add_coin("0x0c", 5_000_000_000);
    *chain.delay.lock().unwrap() = Some(Duration::from_secs(30));

    let (kind, message) = expect_failure(
        call(
            &state,
            "transfer_sui",
            json!({ "fromWallet": "alice", "toAddress": RECIPIENT, "amount": 1 }),
        )
        .await,
    );
    assert_eq!(kind, FailureKind::TimeoutFailure);
    assert_eq!(message, "operation timed out");

    // Run the clock well past the mock's delay; the abandoned handler must stay dead.
    tokio::time::advance(Duration::from_secs(60)).await;
    tokio::task::yield_now().await;
    assert!(chain.built_transfers.lock().unwrap().is_empty());
    assert!(chain.executed.lock().unwrap().is_empty());

    *chain.delay.lock().unwrap() = None;
    let gas = expect_success(call(&state, "get_gas_price", json!({})).await);
    assert_eq!(gas["referenceGasPrice"], "750");
}

#[tokio::test]
async fn test_get_balance_and_gas_price() {
    let chain = MockChain::new();
    let state = test_state(chain.clone());
    let created = expect_success(call(&state, "create_wallet", json!({ "name": "alice" })).await);
    let address = created["wallet"]["address"].as_str().unwrap();
    chain.set_sui_balance(address, 2_500_000_000);

    let balance = expect_success(call(&state, "get_balance", json!({ "walletName": "alice" })).await);
    assert_eq!(balance["coinType"], "0x2::sui::SUI");
    assert_eq!(balance["balance"]["totalBalance"], "2500000000");
    assert_eq!(balance["balance"]["sui"], 2.5);

    let gas = expect_success(call(&state, "get_gas_price", json!({})).await);
    assert_eq!(gas["referenceGasPrice"], "750");
    assert_eq!(gas["unit"], "MIST");
}

#[tokio::test]
async fn test_objects_and_object_details() {
    let state = test_state(MockChain::new());
    expect_success(call(&state, "create_wallet", json!({ "name": "alice" })).await);

    let objects = expect_success(
        call(&state, "get_objects", json!({ "walletName": "alice", "limit": 5 })).await,
    );
    assert_eq!(objects["count"], 1);
    assert_eq!(objects["hasNextPage"], false);

    let details =
        expect_success(call(&state, "get_object_details", json!({ "objectId": "0x5" })).await);
    assert_eq!(details["objectId"], "0x5");

    let (kind, message) =
        expect_failure(call(&state, "get_object_details", json!({ "objectId": "0xdead" })).await);
    assert_eq!(kind, FailureKind::HandlerFailure);
    assert!(message.contains("not available"));
}

#[tokio::test]
async fn test_transfer_sui_signs_and_executes() {
    let chain = MockChain::new();
    let state = test_state(chain.clone());
    let created = expect_success(call(&state, "create_wallet", json!({ "name": "alice" })).await);
    let sender = created["wallet"]["address"].as_str().unwrap().to_string();
    chain.add_coin("0x0c", 5_000_000_000);

    let transfer = expect_success(
        call(
            &state,
            "transfer_sui",
            json!({ "fromWallet": "alice", "toAddress": RECIPIENT, "amount": 1.5 }),
        )
        .await,
    );
    assert_eq!(transfer["success"], true);
    assert_eq!(transfer["from"], sender.as_str());
    assert_eq!(transfer["to"], RECIPIENT);
    assert_eq!(transfer["mist"], "1500000000");
    assert_eq!(transfer["amount"], 1.5);

    let built = chain.built_transfers.lock().unwrap().clone();
    assert_eq!(built.len(), 1);
    assert_eq!(built[0]["amount"], 1_500_000_000u64);
    assert_eq!(built[0]["gasBudget"], 10_000_000u64);
    assert_eq!(built[0]["coin"], "0x0c");

    let executed = chain.executed.lock().unwrap().clone();
    assert_eq!(executed.len(), 1);
    let signature = BASE64.decode(&executed[0].1).unwrap();
    assert_eq!(signature.len(), 97);
    assert_eq!(signature[0], 0x00);
}

#[tokio::test]
async fn test_transfer_sui_insufficient_funds_never_executes() {
    let chain = MockChain::new();
    let state = test_state(chain.clone());
    expect_success(call(&state, "create_wallet", json!({ "name": "alice" })).await);
    chain.add_coin("0x0c", 1_000);

    let (kind, message) = expect_failure(
        call(
            &state,
            "transfer_sui",
            json!({ "fromWallet": "alice", "toAddress": RECIPIENT, "amount": 1 }),
        )
        .await,
    );
    assert_eq!(kind, FailureKind::HandlerFailure);
    assert!(message.contains("Insufficient SUI balance"), "{}", message);
    assert!(chain.executed.lock().unwrap().is_empty());

    let (kind, _) = expect_failure(
        call(
            &state,
            "transfer_sui",
            json!({ "fromWallet": "alice", "toAddress": "0x12", "amount": 0.1 }),
        )
        .await,
    );
    assert_eq!(kind, FailureKind::HandlerFailure);
    assert!(chain.built_transfers.lock().unwrap().is_empty());
}

#[tokio::test]
async fn test_aborted_transfer_is_a_handler_failure() {
    let chain = MockChain::new();
    let state = test_state(chain.clone());
    expect_success(call(&state, "create_wallet", json!({ "name": "alice" })).await);
    chain.add_coin("0x0c", 5_000_000_000);
    *chain.execution_error.lock().unwrap() = Some("InsufficientGas".to_string());

    let (kind, message) = expect_failure(
        call(
            &state,
            "transfer_sui",
            json!({ "fromWallet": "alice", "toAddress": RECIPIENT, "amount": 1 }),
        )
        .await,
    );
    assert_eq!(kind, FailureKind::HandlerFailure);
    assert!(message.contains("InsufficientGas"), "{}", message);
    assert!(message.contains("digest-0"), "{}", message);
    assert_eq!(chain.executed.lock().unwrap().len(), 1);

    let (kind, message) = expect_failure(
        call(
            &state,
            "transfer_object",
            json!({ "fromWallet": "alice", "toAddress": RECIPIENT, "objectId": "0x7" }),
        )
        .await,
    );
    assert_eq!(kind, FailureKind::HandlerFailure);
    assert!(message.contains("InsufficientGas"), "{}", message);
}

#[tokio::test]
async fn test_transfer_object_normalizes_object_id() {
    let chain = MockChain::new();
    let state = test_state(chain.clone());
    expect_success(call(&state, "create_wallet", json!({ "name": "alice" })).await);

    let transfer = expect_success(
        call(
            &state,
            "transfer_object",
            json!({ "fromWallet": "alice", "toAddress": RECIPIENT, "objectId": "0x7" }),
        )
        .await,
    );
    assert_eq!(
        transfer["objectId"],
        "0x0000000000000000000000000000000000000000000000000000000000000007"
    );
    assert_eq!(chain.executed.lock().unwrap().len(), 1);
}

#[tokio::test]
async fn test_faucet_refused_on_mainnet() {
    let chain = MockChain::new();
    let config = Config {
        network: sui_mcp_server::blockchain::network::Network::Mainnet,
        ..Config::default()
    };
    let (state, _) = test_state_with(config, chain.clone());
    expect_success(call(&state, "create_wallet", json!({ "name": "alice" })).await);

    let (kind, message) = expect_failure(
        call(&state, "request_tokens_from_faucet", json!({ "walletName": "alice" })).await,
    );
    assert_eq!(kind, FailureKind::HandlerFailure);
    assert_eq!(message, "Faucet is not available on mainnet");
    assert!(chain.faucet_requests.lock().unwrap().is_empty());
}

#[tokio::test]
async fn test_faucet_on_devnet_targets_wallet_address() {
    let chain = MockChain::new();
    let state = test_state(chain.clone());
    let created = expect_success(call(&state, "create_wallet", json!({ "name": "alice" })).await);

    let result = expect_success(
        call(&state, "request_tokens_from_faucet", json!({ "walletName": "alice" })).await,
    );
    assert_eq!(result["success"], true);
    assert_eq!(result["network"], "devnet");

    let requests = chain.faucet_requests.lock().unwrap().clone();
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].1, created["wallet"]["address"].as_str().unwrap());
}

#[tokio::test]
async fn test_validators() {
    let chain = MockChain::new();
    *chain.system_state.lock().unwrap() = json!({
        "epoch": "9",
        "activeValidators": [{ "suiAddress": "0x0a", "name": "one", "votingPower": "10" }]
    });
    let state = test_state(chain);

    let list = expect_success(call(&state, "get_validators", json!({})).await);
    assert_eq!(list["count"], 1);

    let found = expect_success(
        call(&state, "get_validator_info", json!({ "validatorAddress": "0xa" })).await,
    );
    assert_eq!(found["name"], "one");

    let (kind, message) = expect_failure(
        call(&state, "get_validator_info", json!({ "validatorAddress": "0xb" })).await,
    );
    assert_eq!(kind, FailureKind::HandlerFailure);
    assert_eq!(message, "Validator '0xb' not found");
}

#[tokio::test]
async fn test_transaction_history_merges_sent_and_received() {
    let chain = MockChain::new();
    *chain.history.lock().unwrap() = vec![
        json!({ "digest": "a", "timestampMs": "100", "sender": RECIPIENT, "recipient": "x" }),
        json!({ "digest": "b", "timestampMs": "300", "sender": "y", "recipient": RECIPIENT }),
        json!({ "digest": "c", "timestampMs": "200", "sender": RECIPIENT, "recipient": "z" }),
    ];
    let state = test_state(chain);

    let history = expect_success(
        call(&state, "get_transactions", json!({ "address": RECIPIENT, "limit": 2 })).await,
    );
    assert_eq!(history["count"], 2);
    assert_eq!(history["transactions"][0]["digest"], "b");
    assert_eq!(history["transactions"][1]["digest"], "c");

    let digest = expect_success(call(&state, "get_transaction", json!({ "digest": "b" })).await);
    assert_eq!(digest["digest"], "b");
}

#[tokio::test]
async fn test_shared_state_survives_clones() {
    let state = test_state(MockChain::new());
    let other = state.clone();
    expect_success(call(&other, "create_wallet", json!({ "name": "alice" })).await);
    assert!(state.wallets.contains("alice"));
    assert!(Arc::strong_count(&state.tools) >= 2);
}
