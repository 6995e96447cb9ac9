use colored::*;
use exposr_common::config::{Config, EvaluateConfig};
use exposr_core::evaluate::{self as evaluation, Finding, ScanResults};

use crate::mprint;
use crate::terminal::{colors, format, print};

pub async fn evaluate(args: &EvaluateConfig, cfg: &Config) -> anyhow::Result<()> {
    let results: ScanResults = evaluation::load_results(&args.results).await?;
    let findings: Vec<Finding> = evaluation::evaluate(&results, &args.keyword);

    if findings.is_empty() {
        print::header("nothing found", cfg.quiet);
        print::no_results(cfg.quiet);
        return Ok(());
    }

    if cfg.quiet < 2 {
        for (idx, finding) in findings.iter().enumerate() {
            print::tree_head(idx, &finding.address);
            print::as_tree_one_level(format::finding_to_details(finding));
            if idx + 1 != findings.len() {
                mprint!();
            }
        }
    }

    let count: ColoredString = format!("{} findings", findings.len()).bold().red();
    let keyword: ColoredString = args.keyword.as_str().bold().yellow();
    let output: String = format!("{count} matching '{keyword}'")
        .color(colors::TEXT_DEFAULT)
        .to_string();
    print::summary(&output, cfg.quiet);
    Ok(())
}
