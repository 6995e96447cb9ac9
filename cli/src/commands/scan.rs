use std::time::Instant;

use colored::*;
use exposr_common::config::{Config, WorkerConfig};
use exposr_core::health::Readiness;
use exposr_core::worker::{self, WorkerReport};
use tracing::info_span;

use crate::terminal::{colors, print, spinner};

pub async fn scan(args: &WorkerConfig, cfg: &Config) -> anyhow::Result<()> {
    let span = info_span!("scan", indicatif.pb_show = true);
    let guard = span.enter();
    spinner::set_stage(&span, if args.dry_run { "planning probes" } else { "probing" });

    let start_time: Instant = Instant::now();
    let readiness: Readiness = Readiness::new();
    let report: WorkerReport = worker::run_worker(args, readiness).await?;

    drop(guard);

    let planned: ColoredString = format!("{} networks", report.planned).bold().green();
    let failed: ColoredString = format!("{} failed", report.failed).bold().red();
    let skipped: ColoredString = format!("{} skipped", report.skipped).bold().yellow();
    let verb: &str = if args.dry_run { "Planned" } else { "Scanned" };
    let output: String = format!(
        "{verb} {planned}, {failed}, {skipped} in {:.2}s",
        start_time.elapsed().as_secs_f64()
    )
    .color(colors::TEXT_DEFAULT)
    .to_string();

    print::summary(&output, cfg.quiet);
    Ok(())
}
