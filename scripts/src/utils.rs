//! Utilities for the deploy scripts.

use std::{fs, path::Path, str::FromStr};

use alloy::{
    primitives::Address,
    providers::{DynProvider, Provider, ProviderBuilder},
};
use serde_json::{Map, Value};
use tracing::{debug, warn};

use crate::{
    constants::{CONTRACT_KEY_SUFFIX, DEPLOYMENTS_KEY, PLACEHOLDER_PAYMENT_TOKEN},
    errors::ScriptError,
    networks::{NetworkDescriptor, SignerSource},
};

/// Sets up the client with which to deploy to the given network, returning it
/// along with the address of the deployer.
///
/// The credential is checked before any RPC call is made.
pub async fn setup_client(
    network: &NetworkDescriptor,
    rpc_url_override: Option<&str>,
) -> Result<(DynProvider, Address), ScriptError> {
    let signer = network.signer_source()?;
    let url = network.endpoint(rpc_url_override)?;
    debug!("Connecting to network `{}` at {}", network.name, url);

    let provider = match &signer {
        SignerSource::Local(signer) => ProviderBuilder::new()
            .wallet(signer.clone())
            .connect_http(url)
            .erased(),
        SignerSource::Node => ProviderBuilder::new().connect_http(url).erased(),
    };

    verify_chain_id(&provider, network.chain_id).await?;
    let deployer = resolve_deployer(&provider, &signer).await?;

    Ok((provider, deployer))
}

/// Checks that the endpoint serves the chain the network is configured for
pub async fn verify_chain_id(provider: &impl Provider, expected: u64) -> Result<(), ScriptError> {
    let actual = provider
        .get_chain_id()
        .await
        .map_err(|e| ScriptError::ClientInitialization(e.to_string()))?;

    if actual != expected {
        return Err(ScriptError::ChainIdMismatch { expected, actual });
    }

    Ok(())
}

/// Resolves the address of the account that signs the deployment
pub async fn resolve_deployer(
    provider: &impl Provider,
    signer: &SignerSource,
) -> Result<Address, ScriptError> {
    match signer {
        SignerSource::Local(signer) => Ok(signer.address()),
        SignerSource::Node => provider
            .get_accounts()
            .await
            .map_err(|e| ScriptError::ClientInitialization(e.to_string()))?
            .first()
            .copied()
            .ok_or_else(|| {
                ScriptError::ClientInitialization("node has no unlocked accounts".to_string())
            }),
    }
}

/// Parses the payment token address passed to the contract constructor.
///
/// Malformed addresses are rejected. A mixed-case address with a bad EIP-55
/// checksum is accepted with a warning.
pub fn parse_payment_token(token: &str) -> Result<Address, ScriptError> {
    let address = Address::from_str(token).map_err(|e| {
        ScriptError::CalldataConstruction(format!("payment token `{}`: {}", token, e))
    })?;

    let digits = token.strip_prefix("0x").unwrap_or(token);
    let mixed_case = digits.chars().any(|c| c.is_ascii_uppercase())
        && digits.chars().any(|c| c.is_ascii_lowercase());
    if mixed_case && address.to_checksum(None) != format!("0x{}", digits) {
        warn!("Payment token `{}` does not match its checksum {}", token, address);
    }

    let placeholder = Address::from_str(PLACEHOLDER_PAYMENT_TOKEN).ok();
    if placeholder == Some(address) {
        warn!(
            "Using the placeholder payment token {} - replace it with a real ERC20 address",
            address
        );
    }

    Ok(address)
}

/// The key under which a contract's address is recorded in the deployments file,
/// e.g. `real_estate_token_contract` for `RealEstateToken`
pub fn get_contract_key(contract_name: &str) -> String {
    let mut key = String::with_capacity(contract_name.len() + CONTRACT_KEY_SUFFIX.len());
    let mut prev: Option<char> = None;
    for c in contract_name.chars() {
        if c.is_ascii_uppercase()
            && prev.is_some_and(|p| p.is_ascii_lowercase() || p.is_ascii_digit())
        {
            key.push('_');
        }
        key.push(c.to_ascii_lowercase());
        prev = Some(c);
    }

    key.push_str(CONTRACT_KEY_SUFFIX);
    key
}

/// Reads the deployments file as JSON
pub fn get_json_from_file(file_path: &Path) -> Result<Value, ScriptError> {
    let contents =
        fs::read_to_string(file_path).map_err(|e| ScriptError::ReadDeployments(e.to_string()))?;
    serde_json::from_str(&contents).map_err(|e| ScriptError::ReadDeployments(e.to_string()))
}

/// Parses the address recorded for a contract in the deployments file
pub fn parse_addr_from_deployments_file(
    file_path: &Path,
    contract_key: &str,
) -> Result<Address, ScriptError> {
    let parsed_json = get_json_from_file(file_path)?;

    let addr = parsed_json[DEPLOYMENTS_KEY][contract_key].as_str().ok_or_else(|| {
        ScriptError::ReadDeployments(format!("no address recorded for `{}`", contract_key))
    })?;

    Address::from_str(addr).map_err(|e| ScriptError::ReadDeployments(e.to_string()))
}

/// Records a deployed address in the deployments file, creating the file if needed
pub fn write_deployed_address(
    file_path: &Path,
    contract_key: &str,
    address: Address,
) -> Result<(), ScriptError> {
    // If the file doesn't exist, create it
    if !file_path.exists() {
        fs::write(file_path, "{}").map_err(|e| ScriptError::WriteDeployments(e.to_string()))?;
    }
    let mut parsed_json = get_json_from_file(file_path)?;

    let deployments = parsed_json
        .as_object_mut()
        .ok_or_else(|| ScriptError::WriteDeployments("expected a JSON object".to_string()))?
        .entry(DEPLOYMENTS_KEY)
        .or_insert_with(|| Value::Object(Map::new()))
        .as_object_mut()
        .ok_or_else(|| {
            ScriptError::WriteDeployments(format!("`{}` is not a JSON object", DEPLOYMENTS_KEY))
        })?;
    deployments.insert(contract_key.to_string(), Value::String(format!("{address:#x}")));

    let contents = serde_json::to_string_pretty(&parsed_json)
        .map_err(|e| ScriptError::WriteDeployments(e.to_string()))?;
    fs::write(file_path, contents).map_err(|e| ScriptError::WriteDeployments(e.to_string()))?;

    Ok(())
}
