//! Network configuration: the deployment targets known to the scripts and the
//! endpoint and credentials used to reach each of them.
//!
//! Credentials sourced from the environment are read once, when the
//! configuration is loaded. A missing variable leaves an [`Credential::Unset`]
//! entry behind, which only fails once a signer is requested for that network.

use std::{
    collections::BTreeMap,
    env,
    fmt::{self, Debug, Formatter},
    fs,
    path::Path,
    str::FromStr,
};

use alloy::{signers::local::PrivateKeySigner, transports::http::reqwest::Url};
use serde::Deserialize;

use crate::{
    constants::{
        ARBITRUM_SEPOLIA_CHAIN_ID, ARBITRUM_SEPOLIA_NETWORK, ARBITRUM_SEPOLIA_RPC_URL,
        DEFAULT_LOCAL_RPC_URL, DEFAULT_NETWORK, ENV_ACCOUNT_PREFIX, LOCAL_CHAIN_ID,
        SEPOLIA_PRIVATE_KEY_ENV_VAR,
    },
    errors::ScriptError,
};

// ---------
// | Types |
// ---------

/// A single entry in a network's credential list
#[derive(Clone, PartialEq, Eq)]
pub enum Credential {
    /// A hex-encoded private key
    PrivateKey(String),
    /// A credential sourced from an environment variable that was not set at load time
    Unset {
        /// The name of the environment variable
        env_var: String,
    },
}

impl Debug for Credential {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Credential::PrivateKey(_) => write!(f, "PrivateKey(<redacted>)"),
            Credential::Unset { env_var } => write!(f, "Unset({})", env_var),
        }
    }
}

/// The connection parameters of a deployment target
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NetworkDescriptor {
    /// The name by which the network is selected
    pub name: String,
    /// The RPC endpoint, if the network configures one
    pub rpc_url: Option<Url>,
    /// The chain ID the endpoint is expected to report
    pub chain_id: u64,
    /// The credentials of the accounts available on this network.
    ///
    /// An empty list means the node's own unlocked accounts are used.
    pub accounts: Vec<Credential>,
}

/// The identity that signs the deployment transaction
#[derive(Clone)]
pub enum SignerSource {
    /// The first account unlocked on the node, which signs transactions itself
    Node,
    /// A local private key
    Local(PrivateKeySigner),
}

impl NetworkDescriptor {
    /// The endpoint to connect to, preferring the given override
    pub fn endpoint(&self, rpc_url_override: Option<&str>) -> Result<Url, ScriptError> {
        match (rpc_url_override, &self.rpc_url) {
            (Some(url), _) => parse_url(url),
            (None, Some(url)) => Ok(url.clone()),
            (None, None) => parse_url(DEFAULT_LOCAL_RPC_URL),
        }
    }

    /// Resolve the signing identity for this network.
    ///
    /// Only the first configured credential is used.
    pub fn signer_source(&self) -> Result<SignerSource, ScriptError> {
        let credential = match self.accounts.first() {
            None => return Ok(SignerSource::Node),
            Some(credential) => credential,
        };

        match credential {
            Credential::Unset { env_var } => Err(ScriptError::Credential(format!(
                "{} is not set for network `{}`",
                env_var, self.name
            ))),
            Credential::PrivateKey(key) => PrivateKeySigner::from_str(key)
                .map(SignerSource::Local)
                .map_err(|e| {
                    ScriptError::Credential(format!("network `{}`: {}", self.name, e))
                }),
        }
    }
}

/// The mapping from network name to connection parameters
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NetworksConfig {
    /// The configured networks, keyed by name
    networks: BTreeMap<String, NetworkDescriptor>,
}

impl NetworksConfig {
    /// The built-in networks, reading credentials from the process environment
    pub fn builtin() -> Self {
        Self::builtin_with(|var| env::var(var).ok())
    }

    /// The built-in networks, reading credentials through the given lookup
    pub fn builtin_with(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let hardhat = NetworkDescriptor {
            name: DEFAULT_NETWORK.to_string(),
            rpc_url: None,
            chain_id: LOCAL_CHAIN_ID,
            accounts: vec![],
        };

        let arbitrum_sepolia = NetworkDescriptor {
            name: ARBITRUM_SEPOLIA_NETWORK.to_string(),
            // The URL is a constant known to parse
            rpc_url: Url::parse(ARBITRUM_SEPOLIA_RPC_URL).ok(),
            chain_id: ARBITRUM_SEPOLIA_CHAIN_ID,
            accounts: vec![env_credential(SEPOLIA_PRIVATE_KEY_ENV_VAR, &lookup)],
        };

        let networks = [hardhat, arbitrum_sepolia]
            .into_iter()
            .map(|network| (network.name.clone(), network))
            .collect();

        Self { networks }
    }

    /// Load the network configuration: the built-in networks, overridden by
    /// the entries of the given config file if one is provided
    pub fn load(config_path: Option<&Path>) -> Result<Self, ScriptError> {
        let mut config = Self::builtin();
        if let Some(path) = config_path {
            let contents =
                fs::read_to_string(path).map_err(|e| ScriptError::Config(e.to_string()))?;
            config.merge_json(&contents, |var| env::var(var).ok())?;
        }

        Ok(config)
    }

    /// Merge the networks defined in a JSON config file over the current ones
    pub fn merge_json(
        &mut self,
        contents: &str,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<(), ScriptError> {
        let raw: RawConfig =
            serde_json::from_str(contents).map_err(|e| ScriptError::Config(e.to_string()))?;

        for (name, raw_network) in raw.networks {
            let rpc_url = raw_network
                .url
                .as_deref()
                .map(parse_url)
                .transpose()
                .map_err(|e| ScriptError::Config(format!("network `{}`: {}", name, e)))?;

            let accounts = raw_network
                .accounts
                .iter()
                .map(|account| match account.strip_prefix(ENV_ACCOUNT_PREFIX) {
                    Some(var) => env_credential(var, &lookup),
                    None => Credential::PrivateKey(account.clone()),
                })
                .collect();

            let network = NetworkDescriptor {
                name: name.clone(),
                rpc_url,
                chain_id: raw_network.chain_id,
                accounts,
            };
            self.networks.insert(name, network);
        }

        Ok(())
    }

    /// Look up a network by name
    pub fn get(&self, name: &str) -> Result<&NetworkDescriptor, ScriptError> {
        self.networks.get(name).ok_or_else(|| {
            let known = self.networks.keys().cloned().collect::<Vec<_>>().join(", ");
            ScriptError::UnknownNetwork(format!("`{}` (configured: {})", name, known))
        })
    }

    /// Iterate over the configured networks in name order
    pub fn iter(&self) -> impl Iterator<Item = &NetworkDescriptor> {
        self.networks.values()
    }
}

// -----------
// | Helpers |
// -----------

/// A network entry as written in the config file
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawNetwork {
    /// The RPC URL of the network
    url: Option<String>,
    /// The chain ID of the network
    chain_id: u64,
    /// Private keys, or `env:VAR` references to them
    #[serde(default)]
    accounts: Vec<String>,
}

/// The layout of the config file
#[derive(Deserialize)]
struct RawConfig {
    /// The networks defined in the file
    #[serde(default)]
    networks: BTreeMap<String, RawNetwork>,
}

/// Read a credential from the environment, leaving an unset marker if it is absent
fn env_credential(var: &str, lookup: &impl Fn(&str) -> Option<String>) -> Credential {
    match lookup(var) {
        Some(key) => Credential::PrivateKey(key),
        None => Credential::Unset { env_var: var.to_string() },
    }
}

/// Parse an RPC URL
fn parse_url(url: &str) -> Result<Url, ScriptError> {
    Url::parse(url).map_err(|e| ScriptError::ClientInitialization(format!("{}: {}", url, e)))
}

#[cfg(test)]
mod tests {
    use alloy::primitives::address;
    use eyre::Result;

    use super::*;

    /// The first default account of a local Anvil or Hardhat node
    const DEV_PKEY: &str = "0xac0974bec39a17e36ba4a6b4d238ff944bacb478cbed5efcae784d7bf4f2ff80";

    /// An environment with no variables set
    fn no_env(_: &str) -> Option<String> {
        None
    }

    /// An environment holding the dev key as the Sepolia credential
    fn dev_env(var: &str) -> Option<String> {
        (var == SEPOLIA_PRIVATE_KEY_ENV_VAR).then(|| DEV_PKEY.to_string())
    }

    #[test]
    fn test_builtin_networks() -> Result<()> {
        let config = NetworksConfig::builtin_with(no_env);

        let hardhat = config.get(DEFAULT_NETWORK)?;
        assert_eq!(hardhat.chain_id, 1337);
        assert!(hardhat.rpc_url.is_none());
        assert!(hardhat.accounts.is_empty());
        assert_eq!(hardhat.endpoint(None)?.as_str(), "http://127.0.0.1:8545/");

        let sepolia = config.get(ARBITRUM_SEPOLIA_NETWORK)?;
        assert_eq!(sepolia.chain_id, 421614);
        assert_eq!(
            sepolia.endpoint(None)?.as_str(),
            "https://sepolia-rollup.arbitrum.io/rpc"
        );
        assert_eq!(sepolia.accounts.len(), 1);

        Ok(())
    }

    #[test]
    fn test_unset_credential_fails_at_signer() -> Result<()> {
        // Loading succeeds even though the key is missing
        let config = NetworksConfig::builtin_with(no_env);
        let sepolia = config.get(ARBITRUM_SEPOLIA_NETWORK)?;
        assert_eq!(
            sepolia.accounts[0],
            Credential::Unset { env_var: SEPOLIA_PRIVATE_KEY_ENV_VAR.to_string() }
        );

        let res = sepolia.signer_source();
        assert!(matches!(res, Err(ScriptError::Credential(_))));
        Ok(())
    }

    #[test]
    fn test_malformed_credential() -> Result<()> {
        let mut config = NetworksConfig::builtin_with(no_env);
        config.merge_json(
            r#"{ "networks": { "broken": { "chainId": 1, "accounts": ["0x1234"] } } }"#,
            no_env,
        )?;

        let res = config.get("broken")?.signer_source();
        assert!(matches!(res, Err(ScriptError::Credential(_))));
        Ok(())
    }

    #[test]
    fn test_env_credential_signer() -> Result<()> {
        let config = NetworksConfig::builtin_with(dev_env);
        let signer = match config.get(ARBITRUM_SEPOLIA_NETWORK)?.signer_source()? {
            SignerSource::Local(signer) => signer,
            SignerSource::Node => eyre::bail!("expected a local signer"),
        };

        assert_eq!(signer.address(), address!("0xf39Fd6e51aad88F6F4ce6aB8827279cffFb92266"));
        Ok(())
    }

    #[test]
    fn test_local_network_uses_node_accounts() -> Result<()> {
        let config = NetworksConfig::builtin_with(no_env);
        let source = config.get(DEFAULT_NETWORK)?.signer_source()?;
        assert!(matches!(source, SignerSource::Node));
        Ok(())
    }

    #[test]
    fn test_merge_config_file() -> Result<()> {
        let mut config = NetworksConfig::builtin_with(no_env);
        let lookup = |var: &str| (var == "STAGING_KEY").then(|| DEV_PKEY.to_string());
        config.merge_json(
            r#"{
                "networks": {
                    "hardhat": { "url": "http://localhost:9545", "chainId": 31337 },
                    "staging": {
                        "url": "https://rpc.staging.example",
                        "chainId": 42,
                        "accounts": ["env:STAGING_KEY", "env:MISSING_KEY"]
                    }
                }
            }"#,
            lookup,
        )?;

        let hardhat = config.get(DEFAULT_NETWORK)?;
        assert_eq!(hardhat.chain_id, 31337);
        assert_eq!(hardhat.endpoint(None)?.as_str(), "http://localhost:9545/");

        let staging = config.get("staging")?;
        assert_eq!(staging.chain_id, 42);
        assert_eq!(
            staging.accounts,
            vec![
                Credential::PrivateKey(DEV_PKEY.to_string()),
                Credential::Unset { env_var: "MISSING_KEY".to_string() },
            ]
        );

        // Built-in networks not named in the file are kept
        assert!(config.get(ARBITRUM_SEPOLIA_NETWORK).is_ok());
        assert_eq!(config.iter().count(), 3);
        Ok(())
    }

    #[test]
    fn test_example_config_matches_builtin() -> Result<()> {
        let mut config = NetworksConfig::builtin_with(dev_env);
        config.merge_json(include_str!("../networks.example.json"), dev_env)?;

        let sepolia = config.get(ARBITRUM_SEPOLIA_NETWORK)?;
        assert_eq!(sepolia.chain_id, ARBITRUM_SEPOLIA_CHAIN_ID);
        assert_eq!(sepolia.accounts, vec![Credential::PrivateKey(DEV_PKEY.to_string())]);
        assert_eq!(config.get(DEFAULT_NETWORK)?.chain_id, LOCAL_CHAIN_ID);
        Ok(())
    }

    #[test]
    fn test_invalid_config_url() {
        let mut config = NetworksConfig::builtin_with(no_env);
        let res = config.merge_json(
            r#"{ "networks": { "bad": { "url": "not a url", "chainId": 1 } } }"#,
            no_env,
        );
        assert!(matches!(res, Err(ScriptError::Config(_))));
    }

    #[test]
    fn test_load_from_file() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("networks.json");
        fs::write(&path, r#"{ "networks": { "devnet": { "chainId": 7 } } }"#)?;

        let config = NetworksConfig::load(Some(&path))?;
        assert_eq!(config.get("devnet")?.chain_id, 7);
        Ok(())
    }

    #[test]
    fn test_unknown_network() {
        let config = NetworksConfig::builtin_with(no_env);
        assert!(matches!(config.get("mainnet"), Err(ScriptError::UnknownNetwork(_))));
    }

    #[test]
    fn test_endpoint_override() -> Result<()> {
        let config = NetworksConfig::builtin_with(no_env);
        let url = config.get(DEFAULT_NETWORK)?.endpoint(Some("http://10.0.0.2:8545"))?;
        assert_eq!(url.as_str(), "http://10.0.0.2:8545/");
        Ok(())
    }

    #[test]
    fn test_credential_debug_is_redacted() {
        let credential = Credential::PrivateKey(DEV_PKEY.to_string());
        assert!(!format!("{:?}", credential).contains("ac0974"));
    }
}
