//! Implementations of the deploy scripts

use std::time::Duration;

use alloy::{
    network::TransactionBuilder,
    primitives::{Address, TxHash},
    providers::Provider,
    rpc::types::{TransactionReceipt, TransactionRequest},
};
use tracing::{debug, info, warn};

use crate::{
    artifacts::{resolve_artifact, ContractArtifact},
    cli::DeployArgs,
    constants::{MAX_RECEIPT_POLLS, RECEIPT_POLL_INTERVAL_MS},
    errors::ScriptError,
    networks::{NetworkDescriptor, NetworksConfig},
    types::DeploymentResult,
    utils::{get_contract_key, parse_payment_token, setup_client, write_deployed_address},
};

/// Deploys the contract to the given network, passing the payment token to its constructor.
///
/// Every run sends a new deployment transaction, so the contract lands at a
/// new address each time.
pub async fn deploy(
    args: DeployArgs,
    network: &NetworkDescriptor,
    rpc_url_override: Option<&str>,
) -> Result<DeploymentResult, ScriptError> {
    let payment_token = parse_payment_token(&args.payment_token)?;
    let (provider, deployer) = setup_client(network, rpc_url_override).await?;
    deploy_with(&provider, deployer, payment_token, &args).await
}

/// Deploys the contract from `deployer` through an already connected provider
pub async fn deploy_with(
    provider: &impl Provider,
    deployer: Address,
    payment_token: Address,
    args: &DeployArgs,
) -> Result<DeploymentResult, ScriptError> {
    info!("Deploying contracts with the account: {}", deployer);

    let artifact = resolve_artifact(&args.artifacts, &args.contract)?;
    debug!(
        "Resolved `{}` ({} bytes of creation code)",
        artifact.contract_name,
        artifact.bytecode.len()
    );

    let nonce = provider
        .get_transaction_count(deployer)
        .await
        .map_err(|e| ScriptError::NonceFetching(e.to_string()))?;
    let expected_address = deployer.create(nonce);
    debug!("Expected {} address: {}", artifact.contract_name, expected_address);

    let tx = deployment_tx(&artifact, deployer, nonce, payment_token);
    let pending_tx = provider
        .send_transaction(tx)
        .await
        .map_err(|e| ScriptError::ContractDeployment(e.to_string()))?;
    let tx_hash = *pending_tx.tx_hash();
    debug!("Sent deployment transaction {}", tx_hash);

    let receipt = wait_for_receipt(provider, tx_hash).await?;
    if !receipt.status() {
        return Err(ScriptError::ContractDeployment(format!(
            "transaction {} reverted",
            tx_hash
        )));
    }

    let address = receipt.contract_address.ok_or_else(|| {
        ScriptError::ContractDeployment(format!("receipt of {} has no contract address", tx_hash))
    })?;
    if address != expected_address {
        warn!(
            "{} deployed at {}, expected {}",
            artifact.contract_name, address, expected_address
        );
    }

    wait_for_confirmations(provider, &receipt, args.confirmations).await?;
    info!("{} address: {}", artifact.contract_name, address);

    if let Some(deployments_path) = &args.deployments_path {
        let contract_key = get_contract_key(&artifact.contract_name);
        write_deployed_address(deployments_path, &contract_key, address)?;
        debug!("Recorded `{}` in {}", contract_key, deployments_path.display());
    }

    Ok(DeploymentResult {
        contract_name: artifact.contract_name,
        deployer,
        address,
        tx_hash,
        block_number: receipt.block_number,
    })
}

/// Polls for the receipt of the given transaction until it is mined
async fn wait_for_receipt(
    provider: &impl Provider,
    tx_hash: TxHash,
) -> Result<TransactionReceipt, ScriptError> {
    for _ in 0..MAX_RECEIPT_POLLS {
        let receipt = provider
            .get_transaction_receipt(tx_hash)
            .await
            .map_err(|e| ScriptError::ContractDeployment(e.to_string()))?;
        match receipt {
            Some(receipt) => return Ok(receipt),
            None => tokio::time::sleep(Duration::from_millis(RECEIPT_POLL_INTERVAL_MS)).await,
        }
    }

    Err(ScriptError::ContractDeployment(format!("no receipt for {} after retries", tx_hash)))
}

/// Waits until the block containing the receipt has the given number of confirmations.
///
/// The inclusion block counts as the first confirmation.
async fn wait_for_confirmations(
    provider: &impl Provider,
    receipt: &TransactionReceipt,
    confirmations: u64,
) -> Result<(), ScriptError> {
    if confirmations <= 1 {
        return Ok(());
    }

    let mined = receipt.block_number.ok_or_else(|| {
        ScriptError::ContractDeployment(format!(
            "receipt of {} has no block number",
            receipt.transaction_hash
        ))
    })?;
    let target = mined + confirmations - 1;

    loop {
        let head = provider
            .get_block_number()
            .await
            .map_err(|e| ScriptError::ContractDeployment(e.to_string()))?;
        if head >= target {
            return Ok(());
        }

        debug!("At block {}, waiting for block {}", head, target);
        tokio::time::sleep(Duration::from_millis(RECEIPT_POLL_INTERVAL_MS)).await;
    }
}

/// Builds the contract creation transaction.
///
/// The nonce is pinned so that the contract lands at the address derived from it.
fn deployment_tx(
    artifact: &ContractArtifact,
    deployer: Address,
    nonce: u64,
    payment_token: Address,
) -> TransactionRequest {
    TransactionRequest::default()
        .with_from(deployer)
        .with_nonce(nonce)
        .with_deploy_code(artifact.deploy_code(payment_token))
}

/// Logs the configured networks
pub fn list_networks(config: &NetworksConfig) {
    for network in config.iter() {
        let url = network
            .rpc_url
            .as_ref()
            .map(|url| url.to_string())
            .unwrap_or_else(|| "<local default>".to_string());
        info!(
            "{}: chain id {}, rpc {}, {} account(s)",
            network.name,
            network.chain_id,
            url,
            network.accounts.len()
        );
    }
}
