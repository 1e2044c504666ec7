//! Type definitions used throughout the scripts

use alloy::primitives::{Address, TxHash};

/// The outcome of a successful contract deployment
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeploymentResult {
    /// The name of the deployed contract
    pub contract_name: String,
    /// The account that sent the deployment transaction
    pub deployer: Address,
    /// The address of the deployed contract
    pub address: Address,
    /// The hash of the deployment transaction
    pub tx_hash: TxHash,
    /// The block in which the deployment transaction was included
    pub block_number: Option<u64>,
}
