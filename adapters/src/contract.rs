//! Collection contract bindings and compiled-artifact loading.
//!
//! The Solidity side is treated as an opaque compiled artifact: the ABI and
//! creation bytecode come out of the build tool's JSON output, and the typed
//! bindings below cover the handful of methods the bot drives.

use std::path::Path;

use ethers::abi::Abi;
use ethers::prelude::*;
use ethers::utils::keccak256;
use serde::Deserialize;

use crate::errors::ChainError;

/// Where the build tool writes the compiled collection contract.
pub const DEFAULT_ARTIFACT_PATH: &str =
    "artifacts/contracts/NFTCollection.sol/NFTCollection.json";

abigen!(
    NFTCollection,
    r#"[
        function mint(address recipient, string metadataURI) external payable
        function mintPrice() external view returns (uint256)
        function getCurrentTokenId() external view returns (uint256)
        function mintingEnabled() external view returns (bool)
        function maxSupply() external view returns (uint256)
        function totalSupply() external view returns (uint256)
        function name() external view returns (string)
        function symbol() external view returns (string)
        function owner() external view returns (address)
        function mintedByAddress(address account) external view returns (uint256)
        function maxMintPerAddress() external view returns (uint256)
        event NFTMinted(uint256 indexed tokenId, address indexed recipient, string metadataURI)
    ]"#
);

/// Compiled contract artifact, as emitted by the Solidity build.
#[derive(Deserialize, Debug, Clone)]
pub struct CollectionArtifact {
    pub abi: Abi,
    bytecode: String,
}

impl CollectionArtifact {
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ChainError> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|_| {
            ChainError::ArtifactError(format!(
                "contract artifact not found at {}; compile the contract first",
                path.display()
            ))
        })?;
        serde_json::from_str(&raw)
            .map_err(|err| ChainError::ArtifactError(format!("invalid artifact: {err}")))
    }

    /// Creation bytecode as raw bytes.
    pub fn bytecode(&self) -> Result<Bytes, ChainError> {
        let hex_str = self.bytecode.trim_start_matches("0x");
        let bytes = hex::decode(hex_str)
            .map_err(|err| ChainError::ArtifactError(format!("invalid bytecode hex: {err}")))?;
        Ok(Bytes::from(bytes))
    }
}

/// Topic hash of the `NFTMinted` event.
pub fn minted_event_topic() -> H256 {
    H256::from(keccak256("NFTMinted(uint256,address,string)"))
}

/// Pull the minted token id out of a receipt log, if the log is an
/// `NFTMinted` event. The id is the first indexed topic.
pub fn minted_token_id(log: &Log) -> Option<U256> {
    if log.topics.first() == Some(&minted_event_topic()) && log.topics.len() >= 2 {
        Some(U256::from_big_endian(log.topics[1].as_bytes()))
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const SAMPLE_ARTIFACT: &str = r#"{
        "abi": [
            {
                "type": "function",
                "name": "mintPrice",
                "inputs": [],
                "outputs": [{"name": "", "type": "uint256"}],
                "stateMutability": "view"
            }
        ],
        "bytecode": "0x60008060093d393df3"
    }"#;

    #[test]
    fn loads_abi_and_bytecode_from_artifact_json() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(SAMPLE_ARTIFACT.as_bytes()).unwrap();

        let artifact = CollectionArtifact::load(file.path()).unwrap();
        assert!(artifact.abi.function("mintPrice").is_ok());
        assert_eq!(
            artifact.bytecode().unwrap().to_vec(),
            hex::decode("60008060093d393df3").unwrap()
        );
    }

    #[test]
    fn missing_artifact_mentions_the_path_and_the_fix() {
        let err = CollectionArtifact::load("no/such/file.json").unwrap_err();
        let message = err.to_string();
        assert!(message.contains("no/such/file.json"));
        assert!(message.contains("compile"));
    }

    #[test]
    fn minted_token_id_decodes_the_first_indexed_topic() {
        let log = Log {
            topics: vec![minted_event_topic(), H256::from_low_u64_be(42)],
            ..Default::default()
        };
        assert_eq!(minted_token_id(&log), Some(U256::from(42)));

        let unrelated = Log {
            topics: vec![H256::zero(), H256::from_low_u64_be(42)],
            ..Default::default()
        };
        assert_eq!(minted_token_id(&unrelated), None);
    }
}
