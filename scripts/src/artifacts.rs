//! Resolution of compiled contract artifacts.
//!
//! Artifacts are produced by the Solidity toolchain ahead of time. Both the
//! Hardhat layout (`artifacts/contracts/<Name>.sol/<Name>.json`, bytecode as a
//! hex string) and the Foundry layout (`out/<Name>.sol/<Name>.json`, bytecode
//! under `bytecode.object`) are understood.

use std::{
    fs,
    path::{Path, PathBuf},
    str::FromStr,
};

use alloy::{
    json_abi::JsonAbi,
    primitives::{Address, Bytes},
    sol_types::SolValue,
};
use serde::Deserialize;
use tracing::warn;
use walkdir::WalkDir;

use crate::{
    constants::{ARTIFACT_EXTENSION, BUILD_INFO_DIR, PAYMENT_TOKEN_PARAM_TYPE},
    errors::ScriptError,
};

/// The compiled interface and creation bytecode of a contract
#[derive(Debug, Clone)]
pub struct ContractArtifact {
    /// The name of the contract
    pub contract_name: String,
    /// The contract's ABI
    pub abi: JsonAbi,
    /// The creation bytecode, without constructor arguments
    pub bytecode: Bytes,
}

/// An artifact file as written by the compiler toolchain
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawArtifact {
    /// The contract name, present in Hardhat artifacts
    contract_name: Option<String>,
    /// The contract ABI
    abi: JsonAbi,
    /// The creation bytecode
    bytecode: RawBytecode,
}

/// The two encodings of the creation bytecode
#[derive(Deserialize)]
#[serde(untagged)]
enum RawBytecode {
    /// Hardhat: a bare hex string
    Hex(String),
    /// Foundry: an object holding the hex string
    Object {
        /// The hex-encoded bytecode
        object: String,
    },
}

impl ContractArtifact {
    /// Parse an artifact for the contract with the given name from its JSON contents
    pub fn from_json(contract_name: &str, contents: &str) -> Result<Self, ScriptError> {
        let raw: RawArtifact = serde_json::from_str(contents)
            .map_err(|e| ScriptError::ArtifactParsing(e.to_string()))?;

        if let Some(name) = raw.contract_name.as_deref() {
            if name != contract_name {
                return Err(ScriptError::ArtifactParsing(format!(
                    "expected contract `{}`, artifact is for `{}`",
                    contract_name, name
                )));
            }
        }

        let hex = match &raw.bytecode {
            RawBytecode::Hex(hex) => hex,
            RawBytecode::Object { object } => object,
        };
        let bytecode =
            Bytes::from_str(hex).map_err(|e| ScriptError::ArtifactParsing(e.to_string()))?;
        if bytecode.is_empty() {
            // Interfaces and abstract contracts compile to no bytecode
            return Err(ScriptError::ArtifactParsing(format!(
                "`{}` has no creation bytecode",
                contract_name
            )));
        }

        Ok(Self {
            contract_name: contract_name.to_string(),
            abi: raw.abi,
            bytecode,
        })
    }

    /// Load the artifact at the given path
    pub fn load(path: &Path, contract_name: &str) -> Result<Self, ScriptError> {
        let contents = fs::read_to_string(path)
            .map_err(|e| ScriptError::ArtifactParsing(format!("{}: {}", path.display(), e)))?;
        Self::from_json(contract_name, &contents)
    }

    /// Check that the constructor, if the ABI declares one, takes exactly one
    /// `address`, the payment token
    pub fn validate_constructor(&self) -> Result<(), ScriptError> {
        let Some(constructor) = self.abi.constructor() else {
            warn!(
                "`{}` declares no constructor, the payment token argument is ignored",
                self.contract_name
            );
            return Ok(());
        };

        match constructor.inputs.as_slice() {
            [param] if param.ty == PAYMENT_TOKEN_PARAM_TYPE => Ok(()),
            inputs => {
                let types = inputs.iter().map(|p| p.ty.as_str()).collect::<Vec<_>>();
                Err(ScriptError::ArtifactParsing(format!(
                    "`{}` constructor takes ({}), expected ({})",
                    self.contract_name,
                    types.join(","),
                    PAYMENT_TOKEN_PARAM_TYPE
                )))
            }
        }
    }

    /// The data of the deployment transaction: the creation bytecode followed
    /// by the ABI-encoded payment token
    pub fn deploy_code(&self, payment_token: Address) -> Bytes {
        let mut code = self.bytecode.to_vec();
        code.extend(payment_token.abi_encode());
        code.into()
    }
}

/// Find the artifact file of the given contract under the artifacts directory
pub fn find_artifact(artifacts_dir: &Path, contract_name: &str) -> Result<PathBuf, ScriptError> {
    let file_name = format!("{}.{}", contract_name, ARTIFACT_EXTENSION);
    let mut matches = Vec::new();

    // Symlinks are not followed
    let walker = WalkDir::new(artifacts_dir).into_iter().filter_entry(|entry| {
        entry.depth() == 0 || !(entry.file_type().is_dir() && entry.file_name() == BUILD_INFO_DIR)
    });
    for entry in walker {
        let entry = entry.map_err(|e| ScriptError::ArtifactNotFound(e.to_string()))?;
        if entry.file_type().is_file() && entry.file_name() == file_name.as_str() {
            matches.push(entry.into_path());
        }
    }

    matches.sort();
    match matches.as_slice() {
        [] => Err(ScriptError::ArtifactNotFound(format!(
            "no artifact for `{}` under {}",
            contract_name,
            artifacts_dir.display()
        ))),
        [path] => Ok(path.clone()),
        paths => {
            let paths = paths.iter().map(|p| p.display().to_string()).collect::<Vec<_>>();
            Err(ScriptError::ArtifactNotFound(format!(
                "multiple artifacts for `{}`: {}",
                contract_name,
                paths.join(", ")
            )))
        }
    }
}

/// Locate, parse, and validate the artifact of the given contract
pub fn resolve_artifact(
    artifacts_dir: &Path,
    contract_name: &str,
) -> Result<ContractArtifact, ScriptError> {
    let path = find_artifact(artifacts_dir, contract_name)?;
    let artifact = ContractArtifact::load(&path, contract_name)?;
    artifact.validate_constructor()?;
    Ok(artifact)
}
