//! # Asset Sources
//!
//! Where firewall rules and instances come from. The engine only sees the
//! decoded records; listing, paging and retrying are the exporter's job.

use std::path::{Path, PathBuf};

use anyhow::Context;
use async_trait::async_trait;
use exposr_common::asset::{AssetRecord, FIREWALL_ASSET_TYPE, FirewallRule, INSTANCE_ASSET_TYPE, Instance};
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

#[async_trait]
pub trait AssetSource: Send + Sync {
    async fn firewalls(&self) -> anyhow::Result<Vec<FirewallRule>>;
    async fn instances(&self) -> anyhow::Result<Vec<Instance>>;
}

/// Reads asset inventory exports from disk.
///
/// Each file is either a JSON array of asset envelopes or one envelope per
/// line. Both paths may point at the same combined export; records are
/// filtered by `assetType`.
pub struct ExportFileSource {
    firewalls: PathBuf,
    instances: PathBuf,
}

impl ExportFileSource {
    pub fn new(firewalls: impl Into<PathBuf>, instances: impl Into<PathBuf>) -> Self {
        Self {
            firewalls: firewalls.into(),
            instances: instances.into(),
        }
    }
}

#[async_trait]
impl AssetSource for ExportFileSource {
    async fn firewalls(&self) -> anyhow::Result<Vec<FirewallRule>> {
        load(&self.firewalls, FIREWALL_ASSET_TYPE).await
    }

    async fn instances(&self) -> anyhow::Result<Vec<Instance>> {
        load(&self.instances, INSTANCE_ASSET_TYPE).await
    }
}

async fn load<T: DeserializeOwned>(path: &Path, asset_type: &str) -> anyhow::Result<Vec<T>> {
    let raw: String = tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("reading asset export {}", path.display()))?;

    let records: Vec<AssetRecord> = parse_records(&raw)
        .with_context(|| format!("parsing asset export {}", path.display()))?;
    debug!("{} record(s) in {}", records.len(), path.display());

    Ok(decode_records(&records, asset_type))
}

/// Splits an export into envelopes. Envelopes that are not valid JSON
/// objects are logged and skipped; a broken top-level array is an error.
pub fn parse_records(raw: &str) -> anyhow::Result<Vec<AssetRecord>> {
    let values: Vec<(usize, serde_json::Value)> = if raw.trim_start().starts_with('[') {
        let array: Vec<serde_json::Value> = serde_json::from_str(raw)?;
        array.into_iter().enumerate().collect()
    } else {
        raw.lines()
            .enumerate()
            .filter(|(_, line)| !line.trim().is_empty())
            .filter_map(|(idx, line)| match serde_json::from_str(line) {
                Ok(value) => Some((idx, value)),
                Err(e) => {
                    warn!("skipping line {}: {e}", idx + 1);
                    None
                }
            })
            .collect()
    };

    let records: Vec<AssetRecord> = values
        .into_iter()
        .filter_map(|(idx, value)| match serde_json::from_value(value) {
            Ok(record) => Some(record),
            Err(e) => {
                warn!("skipping record {}: {e}", idx + 1);
                None
            }
        })
        .collect();

    Ok(records)
}

/// Decodes every record of `asset_type`, skipping the ones that fail.
pub fn decode_records<T: DeserializeOwned>(records: &[AssetRecord], asset_type: &str) -> Vec<T> {
    records
        .iter()
        .filter(|record| record.is_kind(asset_type))
        .filter_map(|record| match record.decode::<T>() {
            Ok(decoded) => Some(decoded),
            Err(e) => {
                warn!("{e}");
                None
            }
        })
        .collect()
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝
