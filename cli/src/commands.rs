pub mod discover;
pub mod evaluate;
pub mod scan;

use std::net::SocketAddr;
use std::path::PathBuf;

use clap::{ArgAction, Args, Parser, Subcommand};
use exposr_common::config::{DiscoverConfig, EvaluateConfig, WorkerConfig};
use exposr_core::evaluate::DEFAULT_KEYWORD;

#[derive(Parser)]
#[command(name = "exposr")]
#[command(about = "Finds internet-exposed cloud networks and plans port scans against them.")]
#[command(version)]
pub struct CommandLine {
    #[command(subcommand)]
    pub command: Commands,

    /// Reduce output, repeat for less (-q, -qq)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub quiet: u8,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Aggregate firewall exposure into scan descriptors
    #[command(alias = "d")]
    Discover(DiscoverArgs),
    /// Run port scans for queued scan descriptors
    #[command(alias = "s")]
    Scan(ScanArgs),
    /// Look for a keyword in converted scan results
    #[command(alias = "e")]
    Evaluate(EvaluateArgs),
}

#[derive(Args)]
pub struct DiscoverArgs {
    /// Firewall asset export
    #[arg(long, env = "EXPOSR_FIREWALLS")]
    pub firewalls: PathBuf,
    /// Instance asset export
    #[arg(long, env = "EXPOSR_INSTANCES")]
    pub instances: PathBuf,
    /// Directory receiving <date>/scan-config.txt
    #[arg(short, long, env = "EXPOSR_OUTPUT_DIR", default_value = ".")]
    pub output_dir: PathBuf,
    /// Also append one JSON message per network to this queue file
    #[arg(long, env = "EXPOSR_QUEUE_FILE")]
    pub queue_file: Option<PathBuf>,
    /// Seed for the network shuffle
    #[arg(long, env = "EXPOSR_SEED")]
    pub seed: Option<u64>,
}

#[derive(Args)]
pub struct ScanArgs {
    /// Queue file with one scan descriptor per line
    #[arg(short, long, env = "EXPOSR_INPUT")]
    pub input: PathBuf,
    /// Print the nmap commands instead of running them
    #[arg(long, env = "EXPOSR_DRY_RUN")]
    pub dry_run: bool,
    /// Directory receiving one XML report per network
    #[arg(long, env = "EXPOSR_RESULTS_DIR")]
    pub results_dir: Option<PathBuf>,
    /// Serve /health and /ready on this address
    #[arg(long, env = "EXPOSR_HEALTH_ADDR")]
    pub health_addr: Option<SocketAddr>,
}

#[derive(Args)]
pub struct EvaluateArgs {
    /// Scan results converted to JSON
    #[arg(short, long, env = "EXPOSR_RESULTS")]
    pub results: PathBuf,
    /// Script output fragment to alert on
    #[arg(short, long, env = "EXPOSR_KEYWORD", default_value = DEFAULT_KEYWORD)]
    pub keyword: String,
}

impl CommandLine {
    pub fn parse_args() -> Self {
        Self::parse()
    }
}

impl From<DiscoverArgs> for DiscoverConfig {
    fn from(args: DiscoverArgs) -> Self {
        DiscoverConfig {
            firewalls: args.firewalls,
            instances: args.instances,
            output_dir: args.output_dir,
            queue_file: args.queue_file,
            seed: args.seed,
        }
    }
}

impl From<ScanArgs> for WorkerConfig {
    fn from(args: ScanArgs) -> Self {
        WorkerConfig {
            input: args.input,
            dry_run: args.dry_run,
            results_dir: args.results_dir,
            health_addr: args.health_addr,
        }
    }
}

impl From<EvaluateArgs> for EvaluateConfig {
    fn from(args: EvaluateArgs) -> Self {
        EvaluateConfig {
            results: args.results,
            keyword: args.keyword,
        }
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

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_command_line_is_well_formed() {
        CommandLine::command().debug_assert();
    }

    #[test]
    fn test_discover_flags() {
        let cli = CommandLine::try_parse_from([
            "exposr", "-qq", "d", "--firewalls", "fw.json", "--instances", "vm.json", "--seed", "7",
        ])
        .unwrap();
        assert_eq!(cli.quiet, 2);
        let Commands::Discover(args) = cli.command else {
            panic!("expected discover");
        };
        let cfg: DiscoverConfig = args.into();
        assert_eq!(cfg.firewalls, PathBuf::from("fw.json"));
        assert_eq!(cfg.seed, Some(7));
        assert!(cfg.queue_file.is_none());
    }

    #[test]
    fn test_evaluate_defaults_to_jupyter() {
        let cli = CommandLine::try_parse_from(["exposr", "evaluate", "-r", "out.json"]).unwrap();
        let Commands::Evaluate(args) = cli.command else {
            panic!("expected evaluate");
        };
        assert_eq!(args.keyword, "jupyter");
    }

    #[test]
    fn test_scan_rejects_bad_health_addr() {
        assert!(
            CommandLine::try_parse_from(["exposr", "scan", "-i", "q", "--health-addr", "nope"]).is_err()
        );
    }
}
