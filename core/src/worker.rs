//! # Scan Worker
//!
//! Drains a queue file of scan descriptors and runs one probe per line.
//! Lines are either JSON messages or pipe-delimited records; anything else
//! is logged and skipped so one bad message never stalls the queue.

use std::path::Path;

use anyhow::Context;
use exposr_common::asset::RecordError;
use exposr_common::config::WorkerConfig;
use exposr_common::scan::ScanDescriptor;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{error, info, warn};

use crate::health::{self, Readiness};
use crate::probe::ProbePlan;

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct WorkerReport {
    /// Probes run, or logged when dry-running.
    pub planned: usize,
    /// Probes that could not be spawned or exited unsuccessfully.
    pub failed: usize,
    /// Lines that did not decode into a descriptor.
    pub skipped: usize,
}

/// Decodes one queue line. JSON messages start with `{`.
pub fn parse_queue_line(line: &str) -> Result<ScanDescriptor, RecordError> {
    let line: &str = line.trim();
    if line.starts_with('{') {
        serde_json::from_str(line).map_err(|_| RecordError::MalformedLine(line.to_string()))
    } else {
        line.parse()
    }
}

pub async fn run_worker(cfg: &WorkerConfig, readiness: Readiness) -> anyhow::Result<WorkerReport> {
    if let Some(addr) = cfg.health_addr {
        let readiness: Readiness = readiness.clone();
        tokio::spawn(async move {
            if let Err(e) = health::serve(addr, readiness).await {
                error!("Health endpoint stopped: {e:#}");
            }
        });
    }

    let file = tokio::fs::File::open(&cfg.input)
        .await
        .with_context(|| format!("opening queue {}", cfg.input.display()))?;
    readiness.set_ready(true);

    let mut lines = BufReader::new(file).lines();
    let mut report: WorkerReport = WorkerReport::default();
    let results_dir: Option<&Path> = cfg.results_dir.as_deref();

    if let Some(dir) = results_dir {
        tokio::fs::create_dir_all(dir)
            .await
            .with_context(|| format!("creating {}", dir.display()))?;
    }

    while let Some(line) = lines.next_line().await? {
        if line.trim().is_empty() {
            continue;
        }

        let descriptor: ScanDescriptor = match parse_queue_line(&line) {
            Ok(descriptor) => descriptor,
            Err(e) => {
                warn!("{e}");
                report.skipped += 1;
                continue;
            }
        };

        let plan: ProbePlan = ProbePlan::from_descriptor(&descriptor, results_dir);
        report.planned += 1;

        if cfg.dry_run {
            info!(network = %plan.network, intensity = %plan.intensity, "{}", plan.command_line());
            continue;
        }

        info!(network = %plan.network, intensity = %plan.intensity, "Scanning {} hosts", descriptor.ips.len());
        match plan.execute().await {
            Ok(status) if status.success() => {}
            Ok(status) => {
                warn!(network = %plan.network, "{} exited with {status}", plan.program);
                report.failed += 1;
            }
            Err(e) => {
                error!(network = %plan.network, "{e:#}");
                report.failed += 1;
            }
        }
    }

    readiness.set_ready(false);
    Ok(report)
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝
