//! # Result Evaluation
//!
//! Reads scanner results converted to JSON and reports every script output
//! that mentions a keyword. The converted shape is loose: single elements
//! and lists are interchangeable, and port lists may carry stray strings.

use std::path::Path;

use anyhow::Context;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

pub const DEFAULT_KEYWORD: &str = "jupyter";

#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum OneOrMany<T> {
    Many(Vec<T>),
    One(T),
}

impl<T> Default for OneOrMany<T> {
    fn default() -> Self {
        OneOrMany::Many(Vec::new())
    }
}

impl<T> OneOrMany<T> {
    pub fn as_slice(&self) -> &[T] {
        match self {
            OneOrMany::Many(items) => items,
            OneOrMany::One(item) => std::slice::from_ref(item),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct ScanResults {
    #[serde(default)]
    pub host: OneOrMany<HostResult>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct HostResult {
    pub project: Option<String>,
    pub network: Option<String>,
    pub address: HostAddress,
    pub ports: Option<PortList>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct HostAddress {
    pub addr: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PortList {
    #[serde(default)]
    pub port: OneOrMany<PortEntry>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum PortEntry {
    Port(PortResult),
    Text(String),
}

#[derive(Debug, Clone, Deserialize)]
pub struct PortResult {
    pub portid: String,
    pub protocol: String,
    pub state: Option<PortState>,
    pub script: Option<OneOrMany<ScriptResult>>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PortState {
    pub state: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ScriptResult {
    pub id: String,
    pub output: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Finding {
    pub address: String,
    pub project: Option<String>,
    pub network: Option<String>,
    pub port: String,
    pub protocol: String,
    pub script_id: String,
}

pub async fn load_results(path: &Path) -> anyhow::Result<ScanResults> {
    let raw: String = tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("reading {}", path.display()))?;
    serde_json::from_str(&raw).with_context(|| format!("decoding {}", path.display()))
}

/// Scans every script output for `keyword`, ignoring case.
pub fn evaluate(results: &ScanResults, keyword: &str) -> Vec<Finding> {
    let needle: String = keyword.to_lowercase();
    let mut findings: Vec<Finding> = Vec::new();

    for host in results.host.as_slice() {
        debug!(
            "Checking {} // {} // {}",
            host.project.as_deref().unwrap_or("-"),
            host.network.as_deref().unwrap_or("-"),
            host.address.addr
        );

        let Some(ports) = &host.ports else {
            continue;
        };

        for entry in ports.port.as_slice() {
            let PortEntry::Port(port) = entry else {
                continue;
            };
            let Some(scripts) = &port.script else {
                debug!("No script output on port {}/{}", port.portid, port.protocol);
                continue;
            };

            for script in scripts.as_slice() {
                let matched: bool = script
                    .output
                    .as_deref()
                    .is_some_and(|output| output.to_lowercase().contains(&needle));
                if !matched {
                    continue;
                }

                let finding: Finding = Finding {
                    address: host.address.addr.clone(),
                    project: host.project.clone(),
                    network: host.network.clone(),
                    port: port.portid.clone(),
                    protocol: port.protocol.clone(),
                    script_id: script.id.clone(),
                };
                warn!(
                    address = %finding.address,
                    network = finding.network.as_deref().unwrap_or("-"),
                    port = %finding.port,
                    protocol = %finding.protocol,
                    script = %finding.script_id,
                    "{keyword} exposed"
                );
                findings.push(finding);
            }
        }
    }

    findings
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝
