use std::time::{Duration, Instant};

use colored::*;
use exposr_common::asset::{FirewallRule, Instance};
use exposr_common::config::{Config, DiscoverConfig};
use exposr_common::scan::ScanDescriptor;
use exposr_core::engine::{self, Aggregation};
use exposr_core::sink::{DescriptorSink, QueueFile, ScanConfigFile};
use exposr_core::source::{AssetSource, ExportFileSource};
use tracing::info_span;

use crate::mprint;
use crate::terminal::{colors, format, print, spinner};

pub async fn discover(args: &DiscoverConfig, cfg: &Config) -> anyhow::Result<()> {
    let span = info_span!("discovery", indicatif.pb_show = true);
    let guard = span.enter();
    let start_time: Instant = Instant::now();

    spinner::set_stage(&span, "reading asset exports");
    let source: ExportFileSource = ExportFileSource::new(&args.firewalls, &args.instances);
    let rules: Vec<FirewallRule> = source.firewalls().await?;
    let instances: Vec<Instance> = source.instances().await?;

    spinner::set_stage(&span, "aggregating exposure");
    let aggregation: Aggregation = engine::aggregate(&rules, &instances, args.seed);

    spinner::set_stage(&span, "writing scan descriptors");
    ScanConfigFile::new(&args.output_dir)
        .emit(&aggregation.descriptors)
        .await?;
    if let Some(queue) = &args.queue_file {
        QueueFile::new(queue).emit(&aggregation.descriptors).await?;
    }

    drop(guard);

    discovery_ends(&aggregation, start_time.elapsed(), cfg);
    Ok(())
}

fn discovery_ends(aggregation: &Aggregation, total_time: Duration, cfg: &Config) {
    if aggregation.descriptors.is_empty() {
        print::header("no scan targets", cfg.quiet);
        print::no_results(cfg.quiet);
        return;
    }

    if cfg.quiet < 2 {
        print::header("scan targets", cfg.quiet);
        print_descriptors(&aggregation.descriptors);
    }

    let open_rules = aggregation.exposure.open_rules();
    if !open_rules.is_empty() && cfg.quiet < 2 {
        mprint!();
        print::header("fully open rules", cfg.quiet);
        for (idx, event) in open_rules.iter().enumerate() {
            print::tree_head(idx, &event.rule);
            print::as_tree_one_level(format::open_rule_to_details(event));
        }
    }

    print_summary(&aggregation.descriptors, open_rules.len(), total_time, cfg);
}

fn print_descriptors(descriptors: &[ScanDescriptor]) {
    for (idx, descriptor) in descriptors.iter().enumerate() {
        print::tree_head(idx, &descriptor.network.short_name());
        print::as_tree_one_level(format::descriptor_to_details(descriptor));
        if idx + 1 != descriptors.len() {
            mprint!();
        }
    }
}

fn print_summary(descriptors: &[ScanDescriptor], open_rules: usize, total_time: Duration, cfg: &Config) {
    let hosts: usize = descriptors.iter().map(|descriptor| descriptor.ips.len()).sum();
    let networks: ColoredString = format!("{} networks", descriptors.len()).bold().green();
    let hosts: ColoredString = format!("{hosts} hosts").bold().green();
    let open: ColoredString = format!("{open_rules} fully open").bold().red();
    let total_time: ColoredString = format!("{:.2}s", total_time.as_secs_f64()).bold().yellow();

    let output: String = format!("{networks}, {hosts}, {open} in {total_time}")
        .color(colors::TEXT_DEFAULT)
        .to_string();
    print::summary(&output, cfg.quiet);
}
