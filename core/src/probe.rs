//! # Probe Planning
//!
//! Turns a scan descriptor into a port-scanner invocation. How hard to probe
//! is decided by the port set alone: the `1-65535` sentinel means the whole
//! network is open, so a cheap sweep is enough; a bounded port list gets
//! service and script detection.

use std::fmt;
use std::path::Path;
use std::process::ExitStatus;

use anyhow::Context;
use exposr_common::network::id::NetworkId;
use exposr_common::network::range::PortToken;
use exposr_common::scan::ScanDescriptor;

pub const SCANNER_PROGRAM: &str = "nmap";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProbeIntensity {
    Light,
    Deep,
}

impl ProbeIntensity {
    pub fn for_ports(ports: &[PortToken]) -> Self {
        if ports == [PortToken::FULL] {
            ProbeIntensity::Light
        } else {
            ProbeIntensity::Deep
        }
    }

    fn flags(&self) -> &'static [&'static str] {
        match self {
            ProbeIntensity::Light => &["-Pn", "-T4", "--open"],
            ProbeIntensity::Deep => &["-Pn", "-sV", "-sC", "--open"],
        }
    }
}

impl fmt::Display for ProbeIntensity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProbeIntensity::Light => f.write_str("light"),
            ProbeIntensity::Deep => f.write_str("deep"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProbePlan {
    pub network: NetworkId,
    pub intensity: ProbeIntensity,
    pub program: String,
    pub args: Vec<String>,
}

impl ProbePlan {
    /// Plans one invocation covering every address of the descriptor.
    /// With `results_dir`, the XML report goes to `<dir>/<short_name>.xml`.
    pub fn from_descriptor(descriptor: &ScanDescriptor, results_dir: Option<&Path>) -> Self {
        let intensity: ProbeIntensity = ProbeIntensity::for_ports(&descriptor.ports);

        let mut args: Vec<String> = intensity.flags().iter().map(|s| s.to_string()).collect();
        args.push("-p".to_string());
        args.push(descriptor.port_list());

        if let Some(dir) = results_dir {
            let report = dir.join(format!("{}.xml", descriptor.network.short_name()));
            args.push("-oX".to_string());
            args.push(report.display().to_string());
        }

        args.extend(descriptor.ips.iter().map(ToString::to_string));

        Self {
            network: descriptor.network.clone(),
            intensity,
            program: SCANNER_PROGRAM.to_string(),
            args,
        }
    }

    pub fn command_line(&self) -> String {
        format!("{} {}", self.program, self.args.join(" "))
    }

    pub async fn execute(&self) -> anyhow::Result<ExitStatus> {
        tokio::process::Command::new(&self.program)
            .args(&self.args)
            .kill_on_drop(true)
            .status()
            .await
            .with_context(|| format!("spawning {}", self.program))
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

    fn descriptor(ports: &str) -> ScanDescriptor {
        format!("projects/1/global/networks/default|1.2.3.4 4.4.4.4|{ports}")
            .parse()
            .unwrap()
    }

    #[test]
    fn test_full_range_gets_light_probe() {
        let plan = ProbePlan::from_descriptor(&descriptor("1-65535"), None);
        assert_eq!(plan.intensity, ProbeIntensity::Light);
        assert_eq!(
            plan.command_line(),
            "nmap -Pn -T4 --open -p 1-65535 1.2.3.4 4.4.4.4"
        );
    }

    #[test]
    fn test_bounded_ports_get_deep_probe() {
        let plan = ProbePlan::from_descriptor(&descriptor("443,80,8000-9000"), None);
        assert_eq!(plan.intensity, ProbeIntensity::Deep);
        assert_eq!(
            plan.command_line(),
            "nmap -Pn -sV -sC --open -p 443,80,8000-9000 1.2.3.4 4.4.4.4"
        );
    }

    #[test]
    fn test_full_range_among_others_is_still_deep() {
        assert_eq!(
            ProbeIntensity::for_ports(&[PortToken::FULL, PortToken::Single(22)]),
            ProbeIntensity::Deep
        );
        assert_eq!(ProbeIntensity::for_ports(&[]), ProbeIntensity::Deep);
    }

    #[test]
    fn test_report_path_uses_short_network_name() {
        let plan = ProbePlan::from_descriptor(&descriptor("22"), Some(Path::new("/tmp/results")));
        let idx = plan.args.iter().position(|arg| arg == "-oX").unwrap();
        assert_eq!(
            plan.args[idx + 1],
            Path::new("/tmp/results")
                .join("projects.1.global.networks.default.xml")
                .display()
                .to_string()
        );
    }
}
