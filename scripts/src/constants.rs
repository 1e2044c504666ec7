//! Constants used in the deploy scripts

/// The name of the default network, a local development chain
pub const DEFAULT_NETWORK: &str = "hardhat";

/// The chain ID of the local development chain
pub const LOCAL_CHAIN_ID: u64 = 1337;

/// The RPC URL used for networks that do not configure one
pub const DEFAULT_LOCAL_RPC_URL: &str = "http://127.0.0.1:8545";

/// The name of the Arbitrum Sepolia test network
pub const ARBITRUM_SEPOLIA_NETWORK: &str = "arbitrumSepolia";

/// The public RPC URL of Arbitrum Sepolia
pub const ARBITRUM_SEPOLIA_RPC_URL: &str = "https://sepolia-rollup.arbitrum.io/rpc";

/// The chain ID of Arbitrum Sepolia
pub const ARBITRUM_SEPOLIA_CHAIN_ID: u64 = 421614;

/// The environment variable holding the deployer's private key on Arbitrum Sepolia
pub const SEPOLIA_PRIVATE_KEY_ENV_VAR: &str = "SEPOLIA_TESTNET_PRIVATE_KEY";

/// The environment variable used to select the network
pub const NETWORK_ENV_VAR: &str = "DEPLOY_NETWORK";

/// The prefix marking an account entry in the config file as an environment variable name
pub const ENV_ACCOUNT_PREFIX: &str = "env:";

/// The contract deployed by default
pub const DEFAULT_CONTRACT_NAME: &str = "RealEstateToken";

/// The default directory containing compiled contract artifacts
pub const DEFAULT_ARTIFACTS_DIR: &str = "artifacts";

/// The directory of compiler inputs in a Hardhat artifacts tree, which holds no contract artifacts
pub const BUILD_INFO_DIR: &str = "build-info";

/// The extension of a contract artifact file
pub const ARTIFACT_EXTENSION: &str = "json";

/// The Solidity type of the payment token constructor parameter
pub const PAYMENT_TOKEN_PARAM_TYPE: &str = "address";

/// The payment token passed to the contract constructor by default.
///
/// This is a placeholder; replace it with a real ERC20 token address on Arbitrum Sepolia.
pub const PLACEHOLDER_PAYMENT_TOKEN: &str = "0x1b6bD63ed6985899049695b210c34eBd49Fba9d1";

/// The number of confirmations to wait for the contract deployment transaction
pub const NUM_DEPLOY_CONFIRMATIONS: u64 = 1;

/// The interval between polls for the deployment receipt and new blocks, in milliseconds
pub const RECEIPT_POLL_INTERVAL_MS: u64 = 500;

/// The number of times to poll for the deployment receipt before giving up
pub const MAX_RECEIPT_POLLS: usize = 240;

/// The deployments key in the `deployments.json` file
pub const DEPLOYMENTS_KEY: &str = "deployments";

/// The suffix of a contract's key in the `deployments.json` file
pub const CONTRACT_KEY_SUFFIX: &str = "_contract";

/// The log filter used when `RUST_LOG` is not set
pub const DEFAULT_LOG_FILTER: &str = "info";
