//! # Scan Descriptor
//!
//! The unit handed to downstream scanners: one network, its external
//! addresses and its merged exposed ports.
//!
//! Two encodings are derived from the same value:
//! * a pipe-delimited record, `network|1.2.3.4 5.6.7.8|443,80,8000-9000`,
//! * a JSON message, `{"network": .., "ips": [..], "ports": [..]}`.

use std::net::IpAddr;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::asset::RecordError;
use crate::network::id::NetworkId;
use crate::network::range::PortToken;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScanDescriptor {
    pub network: NetworkId,
    pub ips: Vec<IpAddr>,
    pub ports: Vec<PortToken>,
}

impl ScanDescriptor {
    pub fn new(network: NetworkId, ips: Vec<IpAddr>, ports: Vec<PortToken>) -> Self {
        Self {
            network,
            ips,
            ports,
        }
    }

    /// Whether the ports are exactly the `1-65535` sentinel.
    pub fn is_full_range(&self) -> bool {
        self.ports == [PortToken::FULL]
    }

    pub fn port_list(&self) -> String {
        join(&self.ports, ",")
    }

    pub fn ip_list(&self) -> String {
        join(&self.ips, " ")
    }

    pub fn to_record(&self) -> String {
        format!("{}|{}|{}", self.network, self.ip_list(), self.port_list())
    }

    pub fn to_message(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}

impl FromStr for ScanDescriptor {
    type Err = RecordError;

    /// Parses a pipe-delimited record produced by [`ScanDescriptor::to_record`].
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let malformed = || RecordError::MalformedLine(s.to_string());

        let mut fields = s.trim_end_matches(['\r', '\n']).split('|');
        let (Some(network), Some(ips), Some(ports), None) =
            (fields.next(), fields.next(), fields.next(), fields.next())
        else {
            return Err(malformed());
        };

        if network.is_empty() {
            return Err(malformed());
        }

        let ips: Vec<IpAddr> = ips
            .split_whitespace()
            .map(|ip| ip.parse::<IpAddr>())
            .collect::<Result<_, _>>()
            .map_err(|_| malformed())?;

        let ports: Vec<PortToken> = ports
            .split(',')
            .filter(|port| !port.trim().is_empty())
            .map(|port| port.parse::<PortToken>())
            .collect::<Result<_, _>>()
            .map_err(|_| malformed())?;

        Ok(ScanDescriptor::new(NetworkId::from(network), ips, ports))
    }
}

fn join<T: ToString>(items: &[T], sep: &str) -> String {
    items
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<String>>()
        .join(sep)
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
    use std::net::Ipv4Addr;

    fn sample() -> ScanDescriptor {
        ScanDescriptor::new(
            NetworkId::from("projects/1/global/networks/default"),
            vec![
                IpAddr::V4(Ipv4Addr::new(1, 2, 3, 4)),
                IpAddr::V4(Ipv4Addr::new(4, 4, 4, 4)),
            ],
            vec![
                PortToken::Single(443),
                PortToken::Single(80),
                PortToken::range(8000, 9000),
            ],
        )
    }

    #[test]
    fn test_record_layout() {
        assert_eq!(
            sample().to_record(),
            "projects/1/global/networks/default|1.2.3.4 4.4.4.4|443,80,8000-9000"
        );
    }

    #[test]
    fn test_message_layout() {
        let message = sample().to_message().unwrap();
        assert_eq!(
            message,
            r#"{"network":"projects/1/global/networks/default","ips":["1.2.3.4","4.4.4.4"],"ports":["443","80","8000-9000"]}"#
        );
    }

    #[test]
    fn test_both_encodings_describe_the_same_descriptor() {
        let descriptor = sample();
        let from_record: ScanDescriptor = descriptor.to_record().parse().unwrap();
        let from_message: ScanDescriptor =
            serde_json::from_str(&descriptor.to_message().unwrap()).unwrap();
        assert_eq!(from_record, descriptor);
        assert_eq!(from_message, descriptor);
    }

    #[test]
    fn test_malformed_records() {
        assert!("just-a-network".parse::<ScanDescriptor>().is_err());
        assert!("n|1.2.3.4".parse::<ScanDescriptor>().is_err());
        assert!("n|1.2.3.4|80|extra".parse::<ScanDescriptor>().is_err());
        assert!("n|not-an-ip|80".parse::<ScanDescriptor>().is_err());
        assert!("n|1.2.3.4|http".parse::<ScanDescriptor>().is_err());
        assert!("|1.2.3.4|80".parse::<ScanDescriptor>().is_err());
    }

    #[test]
    fn test_full_range_detection() {
        let mut descriptor = sample();
        assert!(!descriptor.is_full_range());
        descriptor.ports = vec![PortToken::FULL];
        assert!(descriptor.is_full_range());
    }
}
