use std::net::SocketAddr;
use std::path::PathBuf;

/// Terminal output settings shared by every command.
pub struct Config {
    /// 0 prints everything, 1 drops decorations, 2 prints summaries only.
    pub quiet: u8,
}

/// Inputs and outputs of a discovery run.
pub struct DiscoverConfig {
    /// Firewall asset export (JSON array or newline-delimited JSON).
    pub firewalls: PathBuf,
    /// Instance asset export (JSON array or newline-delimited JSON).
    pub instances: PathBuf,
    /// Root under which `<date>/scan-config.txt` is written.
    pub output_dir: PathBuf,
    /// When set, one JSON message per descriptor is appended here.
    pub queue_file: Option<PathBuf>,
    /// Seeds the network shuffle for reproducible ordering.
    pub seed: Option<u64>,
}

pub struct WorkerConfig {
    /// Queued scan descriptors, one JSON message or pipe record per line.
    pub input: PathBuf,
    /// Log planned scans instead of running them.
    pub dry_run: bool,
    /// Where nmap writes XML reports, one per network.
    pub results_dir: Option<PathBuf>,
    /// Address of the `/health` and `/ready` endpoints.
    pub health_addr: Option<SocketAddr>,
}

pub struct EvaluateConfig {
    /// Scan results converted to JSON.
    pub results: PathBuf,
    /// Script output fragment worth alerting on, matched case-insensitively.
    pub keyword: String,
}
