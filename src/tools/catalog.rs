// src/tools/catalog.rs

use serde::Serialize;

use crate::tools::schema::SchemaNode;

/// A tool as advertised by `tools/list`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ToolDescriptor {
    pub name: String,
    pub description: String,
    pub input_schema: SchemaNode,
}

impl ToolDescriptor {
    pub fn new(name: &str, description: &str, input_schema: SchemaNode) -> Self {
        Self {
            name: name.to_string(),
            description: description.to_string(),
            input_schema,
        }
    }
}

pub const NETWORK_NAMES: [&str; 4] = ["mainnet", "testnet", "devnet", "localnet"];

fn no_arguments() -> SchemaNode {
    SchemaNode::object().build()
}

fn wallet_name_only() -> SchemaNode {
    SchemaNode::object()
        .required("walletName", SchemaNode::string("Name of the wallet"))
        .build()
}

/// Every tool the server exposes, in listing order.
pub fn catalog() -> Vec<ToolDescriptor> {
    vec![
        // Wallets
        ToolDescriptor::new(
            "create_wallet",
            "Create a new Sui wallet with mnemonic phrase",
            SchemaNode::object()
                .required("name", SchemaNode::string("Name for the wallet"))
                .build(),
        ),
        ToolDescriptor::new(
            "import_wallet",
            "Import an existing wallet from mnemonic or private key",
            SchemaNode::object()
                .required("name", SchemaNode::string("Name for the wallet"))
                .optional(
                    "mnemonic",
                    SchemaNode::string("Mnemonic phrase (12-24 words)"),
                )
                .optional(
                    "privateKey",
                    SchemaNode::string(
                        "Private key as suiprivkey (Bech32), 0x-prefixed hex or base64",
                    ),
                )
                .build(),
        ),
        ToolDescriptor::new(
            "list_wallets",
            "List all created/imported wallets",
            no_arguments(),
        ),
        ToolDescriptor::new("get_wallet_address", "Get wallet address", wallet_name_only()),
        ToolDescriptor::new(
            "export_wallet",
            "Export wallet private key and mnemonic",
            wallet_name_only(),
        ),
        // Balances and objects
        ToolDescriptor::new(
            "get_balance",
            "Get SUI balance for a wallet",
            SchemaNode::object()
                .required("walletName", SchemaNode::string("Name of the wallet"))
                .optional(
                    "coinType",
                    SchemaNode::string("Coin type (default: 0x2::sui::SUI)"),
                )
                .build(),
        ),
        ToolDescriptor::new(
            "get_all_balances",
            "Get all coin balances for a wallet",
            wallet_name_only(),
        ),
        ToolDescriptor::new(
            "get_objects",
            "Get owned objects for a wallet",
            SchemaNode::object()
                .required("walletName", SchemaNode::string("Name of the wallet"))
                .optional(
                    "filter",
                    SchemaNode::object().describe("Object filter options").build(),
                )
                .optional(
                    "limit",
                    SchemaNode::number("Limit number of objects returned"),
                )
                .build(),
        ),
        ToolDescriptor::new(
            "get_object_details",
            "Get detailed information about an object",
            SchemaNode::object()
                .required("objectId", SchemaNode::string("Object ID"))
                .build(),
        ),
        // Transactions
        ToolDescriptor::new(
            "transfer_sui",
            "Transfer SUI to another address",
            SchemaNode::object()
                .required("fromWallet", SchemaNode::string("Name of the sender wallet"))
                .required("toAddress", SchemaNode::string("Recipient address"))
                .required("amount", SchemaNode::number("Amount in SUI"))
                .build(),
        ),
        ToolDescriptor::new(
            "transfer_object",
            "Transfer an object to another address",
            SchemaNode::object()
                .required("fromWallet", SchemaNode::string("Name of the sender wallet"))
                .required("toAddress", SchemaNode::string("Recipient address"))
                .required("objectId", SchemaNode::string("Object ID to transfer"))
                .build(),
        ),
        ToolDescriptor::new(
            "get_transaction",
            "Get transaction details by digest",
            SchemaNode::object()
                .required("digest", SchemaNode::string("Transaction digest"))
                .build(),
        ),
        ToolDescriptor::new(
            "get_transactions",
            "Get transaction history for an address",
            SchemaNode::object()
                .required(
                    "address",
                    SchemaNode::string("Address to get transactions for"),
                )
                .optional("limit", SchemaNode::number("Limit number of transactions"))
                .build(),
        ),
        ToolDescriptor::new(
            "get_wallet_transactions",
            "Get transaction history for a wallet",
            SchemaNode::object()
                .required("walletName", SchemaNode::string("Name of the wallet"))
                .optional("limit", SchemaNode::number("Limit number of transactions"))
                .build(),
        ),
        // Gas and faucet
        ToolDescriptor::new("get_gas_price", "Get current gas price", no_arguments()),
        ToolDescriptor::new(
            "request_tokens_from_faucet",
            "Request test SUI from faucet (testnet/devnet only)",
            wallet_name_only(),
        ),
        // Network
        ToolDescriptor::new(
            "switch_network",
            "Switch Sui network",
            SchemaNode::object()
                .required(
                    "network",
                    SchemaNode::string_enum("Network to switch to", &NETWORK_NAMES),
                )
                .build(),
        ),
        ToolDescriptor::new(
            "get_network_info",
            "Get current network information",
            no_arguments(),
        ),
        ToolDescriptor::new("get_chain_id", "Get chain identifier", no_arguments()),
        // Validators
        ToolDescriptor::new(
            "get_validators",
            "Get list of active validators",
            no_arguments(),
        ),
        ToolDescriptor::new(
            "get_validator_info",
            "Get detailed information about a validator",
            SchemaNode::object()
                .required(
                    "validatorAddress",
                    SchemaNode::string("Validator Sui address"),
                )
                .build(),
        ),
        // Utilities
        ToolDescriptor::new(
            "validate_address",
            "Validate if an address is a valid Sui address",
            SchemaNode::object()
                .required("address", SchemaNode::string("Address to validate"))
                .build(),
        ),
        ToolDescriptor::new(
            "normalize_address",
            "Normalize a Sui address to full length",
            SchemaNode::object()
                .required("address", SchemaNode::string("Address to normalize"))
                .build(),
        ),
        ToolDescriptor::new(
            "convert_mist_to_sui",
            "Convert MIST to SUI",
            SchemaNode::object()
                .required("mist", SchemaNode::string("Amount in MIST"))
                .build(),
        ),
        ToolDescriptor::new(
            "convert_sui_to_mist",
            "Convert SUI to MIST",
            SchemaNode::object()
                .required("sui", SchemaNode::number("Amount in SUI"))
                .build(),
        ),
    ]
}
