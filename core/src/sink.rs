//! # Descriptor Sinks
//!
//! Where finished scan descriptors go: a dated flat scan-config file, and a
//! newline-delimited queue of JSON messages for scan workers.

use std::path::{Path, PathBuf};

use anyhow::Context;
use async_trait::async_trait;
use chrono::NaiveDate;
use exposr_common::scan::ScanDescriptor;
use tokio::io::AsyncWriteExt;
use tracing::{debug, info};

pub const SCAN_CONFIG_FILE: &str = "scan-config.txt";

/// Where an emit went and how many descriptors it carried.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmitReport {
    pub path: PathBuf,
    pub written: usize,
}

#[async_trait]
pub trait DescriptorSink: Send + Sync {
    async fn emit(&self, descriptors: &[ScanDescriptor]) -> anyhow::Result<EmitReport>;
}

/// `<root>/<YYYY-MM-DD>/scan-config.txt`, one pipe-delimited record per line.
pub struct ScanConfigFile {
    root: PathBuf,
    date: NaiveDate,
}

impl ScanConfigFile {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self::with_date(root, chrono::Local::now().date_naive())
    }

    pub fn with_date(root: impl Into<PathBuf>, date: NaiveDate) -> Self {
        Self {
            root: root.into(),
            date,
        }
    }

    pub fn path(&self) -> PathBuf {
        self.root
            .join(self.date.format("%Y-%m-%d").to_string())
            .join(SCAN_CONFIG_FILE)
    }
}

#[async_trait]
impl DescriptorSink for ScanConfigFile {
    async fn emit(&self, descriptors: &[ScanDescriptor]) -> anyhow::Result<EmitReport> {
        let path: PathBuf = self.path();
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .with_context(|| format!("creating {}", parent.display()))?;
        }

        let body: String = descriptors
            .iter()
            .map(|descriptor| format!("{}\n", descriptor.to_record()))
            .collect();

        tokio::fs::write(&path, body)
            .await
            .with_context(|| format!("writing {}", path.display()))?;

        info!("Scan config written to {}", path.display());
        Ok(EmitReport {
            path,
            written: descriptors.len(),
        })
    }
}

/// Appends one JSON message per descriptor to a queue file.
pub struct QueueFile {
    path: PathBuf,
}

impl QueueFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl DescriptorSink for QueueFile {
    async fn emit(&self, descriptors: &[ScanDescriptor]) -> anyhow::Result<EmitReport> {
        let mut file = tokio::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .await
            .with_context(|| format!("opening queue {}", self.path.display()))?;

        for descriptor in descriptors {
            let message: String = descriptor.to_message()?;
            file.write_all(message.as_bytes()).await?;
            file.write_all(b"\n").await?;
            debug!("queued {}", message);
        }
        file.flush().await?;

        info!(
            "Published {} message(s) to {}",
            descriptors.len(),
            self.path.display()
        );
        Ok(EmitReport {
            path: self.path.clone(),
            written: descriptors.len(),
        })
    }
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝
