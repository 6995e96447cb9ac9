//! # Asset Records
//!
//! Compute resources as they appear in a Cloud Asset Inventory listing with
//! content type `RESOURCE`. Every record is an envelope
//! (`{name, assetType, resource: {data}}`) whose `data` holds the resource
//! body. Only the keys the exposure engine reads are modelled.

use std::fmt;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::network::id::NetworkId;

pub const FIREWALL_ASSET_TYPE: &str = "compute.googleapis.com/Firewall";
pub const INSTANCE_ASSET_TYPE: &str = "compute.googleapis.com/Instance";

#[derive(Debug, Error)]
pub enum RecordError {
    #[error("asset '{0}' has no resource data")]
    MissingData(String),
    #[error("asset '{name}' could not be decoded: {source}")]
    Decode {
        name: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("malformed scan record: {0}")]
    MalformedLine(String),
}

#[derive(Debug, Clone, Deserialize)]
pub struct AssetRecord {
    #[serde(default)]
    pub name: String,
    #[serde(rename = "assetType", default)]
    pub asset_type: String,
    pub resource: Option<AssetResource>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AssetResource {
    #[serde(default)]
    pub data: Option<serde_json::Value>,
}

impl AssetRecord {
    /// Records without an asset type are accepted for any kind.
    pub fn is_kind(&self, asset_type: &str) -> bool {
        self.asset_type.is_empty() || self.asset_type == asset_type
    }

    pub fn decode<T: DeserializeOwned>(&self) -> Result<T, RecordError> {
        let data: &serde_json::Value = self
            .resource
            .as_ref()
            .and_then(|resource| resource.data.as_ref())
            .ok_or_else(|| RecordError::MissingData(self.name.clone()))?;

        T::deserialize(data).map_err(|source| RecordError::Decode {
            name: self.name.clone(),
            source,
        })
    }
}

/// A JSON scalar that exports spell either as a string or as a number.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Scalar {
    Text(String),
    Number(u64),
}

impl fmt::Display for Scalar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Scalar::Text(text) => f.write_str(text),
            Scalar::Number(number) => write!(f, "{number}"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Direction {
    Ingress,
    Egress,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FirewallRule {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub id: Option<Scalar>,
    pub network: NetworkId,
    pub direction: Direction,
    #[serde(default)]
    pub disabled: bool,
    #[serde(default)]
    pub source_ranges: Option<Vec<String>>,
    #[serde(default)]
    pub allowed: Option<Vec<AllowedEntry>>,
    #[serde(default)]
    pub target_tags: Vec<String>,
}

/// One `allowed` clause of a firewall rule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AllowedEntry {
    #[serde(rename = "IPProtocol", default)]
    pub protocol: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ports: Option<Vec<Scalar>>,
}

impl fmt::Display for AllowedEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let protocol: &str = self.protocol.as_deref().unwrap_or("?");
        match &self.ports {
            Some(ports) => {
                let joined: Vec<String> = ports.iter().map(ToString::to_string).collect();
                write!(f, "{protocol}:[{}]", joined.join(","))
            }
            None => f.write_str(protocol),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Instance {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub network_interfaces: Vec<InstanceInterface>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InstanceInterface {
    /// Missing on malformed exports; such interfaces are skipped.
    #[serde(default)]
    pub network: Option<NetworkId>,
    #[serde(default)]
    pub access_configs: Vec<AccessConfig>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccessConfig {
    #[serde(rename = "natIP", default)]
    pub nat_ip: Option<String>,
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝
