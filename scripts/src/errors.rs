//! Definitions of errors that can occur during the execution of the deploy scripts

use std::{
    error::Error,
    fmt::{self, Display, Formatter},
};

/// Errors that can occur during the execution of the deploy scripts
#[derive(Debug)]
pub enum ScriptError {
    /// Error loading the network configuration
    Config(String),
    /// The requested network is not configured
    UnknownNetwork(String),
    /// The signing credential for the network is missing or malformed
    Credential(String),
    /// Error initializing the RPC client
    ClientInitialization(String),
    /// The RPC endpoint reports a different chain than the one configured
    ChainIdMismatch {
        /// The chain ID in the network configuration
        expected: u64,
        /// The chain ID reported by the RPC endpoint
        actual: u64,
    },
    /// The compiled artifact for a contract could not be found
    ArtifactNotFound(String),
    /// Error parsing a Solidity compilation artifact
    ArtifactParsing(String),
    /// Error constructing the constructor calldata
    CalldataConstruction(String),
    /// Error fetching the nonce of the deployer
    NonceFetching(String),
    /// Error deploying a contract
    ContractDeployment(String),
    /// Error reading the `deployments.json` file
    ReadDeployments(String),
    /// Error writing the `deployments.json` file
    WriteDeployments(String),
}

impl Display for ScriptError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            ScriptError::Config(s) => write!(f, "error loading network config: {}", s),
            ScriptError::UnknownNetwork(s) => write!(f, "unknown network: {}", s),
            ScriptError::Credential(s) => write!(f, "invalid credential: {}", s),
            ScriptError::ClientInitialization(s) => write!(f, "error initializing client: {}", s),
            ScriptError::ChainIdMismatch { expected, actual } => write!(
                f,
                "chain id mismatch: configured {}, endpoint reports {}",
                expected, actual
            ),
            ScriptError::ArtifactNotFound(s) => write!(f, "artifact not found: {}", s),
            ScriptError::ArtifactParsing(s) => write!(f, "error parsing artifact: {}", s),
            ScriptError::CalldataConstruction(s) => write!(f, "error constructing calldata: {}", s),
            ScriptError::NonceFetching(s) => write!(f, "error fetching nonce: {}", s),
            ScriptError::ContractDeployment(s) => write!(f, "error deploying contract: {}", s),
            ScriptError::ReadDeployments(s) => write!(f, "error reading deployments: {}", s),
            ScriptError::WriteDeployments(s) => write!(f, "error writing deployments: {}", s),
        }
    }
}

impl Error for ScriptError {}
