//! Definitions of CLI arguments and commands for deploy scripts

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use tracing::debug;

use crate::{
    commands::{deploy, list_networks},
    constants::{
        DEFAULT_ARTIFACTS_DIR, DEFAULT_CONTRACT_NAME, DEFAULT_NETWORK, NETWORK_ENV_VAR,
        NUM_DEPLOY_CONFIRMATIONS, PLACEHOLDER_PAYMENT_TOKEN,
    },
    errors::ScriptError,
    networks::NetworksConfig,
};

/// Deploy the real estate tokenization contracts to an EVM chain
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Name of the network to deploy to
    #[arg(short, long, global = true, env = NETWORK_ENV_VAR, default_value = DEFAULT_NETWORK)]
    pub network: String,

    /// Path to a JSON file with additional or overriding network definitions
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Network RPC URL, overriding the configured one
    #[arg(short, long, global = true)]
    pub rpc_url: Option<String>,

    /// The command to run
    #[command(subcommand)]
    pub command: Command,
}

/// The commands supported by the deploy scripts
#[derive(Subcommand)]
pub enum Command {
    /// Deploy a contract whose constructor takes the payment token address
    Deploy(DeployArgs),
    /// List the configured networks
    Networks,
}

/// Deploy a contract
#[derive(Args)]
pub struct DeployArgs {
    /// Name of the contract to deploy
    #[arg(short, long, default_value = DEFAULT_CONTRACT_NAME)]
    pub contract: String,

    /// Address of the ERC20 token used for payments, passed to the constructor.
    ///
    /// The default is a placeholder; replace it with a real ERC20 token
    /// address on the target network.
    #[arg(short, long, default_value = PLACEHOLDER_PAYMENT_TOKEN)]
    pub payment_token: String,

    /// Directory containing the compiled contract artifacts
    #[arg(short, long, default_value = DEFAULT_ARTIFACTS_DIR)]
    pub artifacts: PathBuf,

    /// Number of confirmations to wait for the deployment transaction, at least one
    #[arg(
        long,
        default_value_t = NUM_DEPLOY_CONFIRMATIONS,
        value_parser = clap::value_parser!(u64).range(1..)
    )]
    pub confirmations: u64,

    /// Path to a `deployments.json` file in which to record the deployed address
    #[arg(short, long)]
    pub deployments_path: Option<PathBuf>,
}

impl Cli {
    /// Load the network configuration and run the selected command
    pub async fn run(self) -> Result<(), ScriptError> {
        let config = NetworksConfig::load(self.config.as_deref())?;

        match self.command {
            Command::Deploy(args) => {
                let network = config.get(&self.network)?;
                let result = deploy(args, network, self.rpc_url.as_deref()).await?;
                debug!(
                    "{} deployed by {} in transaction {} (block {})",
                    result.contract_name,
                    result.deployer,
                    result.tx_hash,
                    result.block_number.map_or_else(|| "pending".to_string(), |n| n.to_string())
                );
            }
            Command::Networks => list_networks(&config),
        }

        Ok(())
    }
}
