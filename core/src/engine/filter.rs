//! Decides whether a firewall rule exposes a network to the internet and,
//! if so, which port grants it contributes.

use exposr_common::asset::{AllowedEntry, Direction, FirewallRule};
use exposr_common::network::id::NetworkId;
use exposr_common::network::range::PortToken;
use tracing::warn;

/// Source range that makes an ingress rule public.
pub const OPEN_SOURCE_RANGE: &str = "0.0.0.0/0";

const ICMP: &str = "icmp";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PortGrant {
    /// Every port is reachable. Carries the clause that opened it.
    FullyOpen(AllowedEntry),
    Port(PortToken),
}

/// The public exposure a single rule contributes to its network.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IngressExposure {
    pub network: NetworkId,
    pub grants: Vec<PortGrant>,
}

/// Returns `None` for rules that do not admit traffic from anywhere.
///
/// A clause with a protocol name (or a comma-joined list of names) but no
/// port list opens the whole network; it ends processing of the rule. A
/// clause with neither a protocol name nor ports has its protocol split on
/// commas and each piece read as a port
/// token. Unparseable tokens are logged and dropped.
pub fn classify(rule: &FirewallRule) -> Option<IngressExposure> {
    if rule.disabled || rule.direction == Direction::Egress {
        return None;
    }
    let allowed: &[AllowedEntry] = rule.allowed.as_deref()?;
    let source_ranges: &[String] = rule.source_ranges.as_deref()?;
    if !source_ranges.iter().any(|range| range == OPEN_SOURCE_RANGE) {
        return None;
    }

    let mut grants: Vec<PortGrant> = Vec::new();

    for entry in allowed {
        let Some(protocol) = entry.protocol.as_deref() else {
            warn!(network = %rule.network, rule = %rule.name, "allowed entry without a protocol, skipping");
            continue;
        };
        if protocol == ICMP {
            continue;
        }

        match &entry.ports {
            None if is_protocol_name(protocol) => {
                warn!(
                    network = %rule.network,
                    rule = %rule.name,
                    rule_id = %rule.id.as_ref().map(ToString::to_string).unwrap_or_default(),
                    target_tags = ?rule.target_tags,
                    entry = %entry,
                    "fully open network found"
                );
                grants.push(PortGrant::FullyOpen(entry.clone()));
                break;
            }
            Some(ports) => {
                for port in ports {
                    push_token(&mut grants, rule, &port.to_string());
                }
            }
            None => {
                // Numeric or mixed protocol with no ports; read it as a port list.
                for piece in protocol.split(',') {
                    push_token(&mut grants, rule, piece);
                }
            }
        }
    }

    Some(IngressExposure {
        network: rule.network.clone(),
        grants,
    })
}

/// Letters, dashes and commas only, e.g. `tcp`, `all`, `tcp,udp`.
pub fn is_protocol_name(protocol: &str) -> bool {
    !protocol.is_empty()
        && protocol
            .chars()
            .all(|c| c.is_ascii_alphabetic() || c == '-' || c == ',')
}

fn push_token(grants: &mut Vec<PortGrant>, rule: &FirewallRule, raw: &str) {
    match raw.parse::<PortToken>() {
        Ok(token) => grants.push(PortGrant::Port(token)),
        Err(e) => warn!(
            network = %rule.network,
            rule = %rule.name,
            token = raw,
            "discarding port token: {e}"
        ),
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
    use exposr_common::asset::Scalar;

    fn entry(protocol: &str, ports: Option<&[&str]>) -> AllowedEntry {
        AllowedEntry {
            protocol: Some(protocol.to_string()),
            ports: ports.map(|ports| ports.iter().map(|p| Scalar::Text(p.to_string())).collect()),
        }
    }

    fn rule(allowed: Vec<AllowedEntry>) -> FirewallRule {
        FirewallRule {
            name: "allow-web".to_string(),
            id: Some(Scalar::Number(42)),
            network: NetworkId::from("projects/p/global/networks/default"),
            direction: Direction::Ingress,
            disabled: false,
            source_ranges: Some(vec!["10.0.0.0/8".into(), OPEN_SOURCE_RANGE.into()]),
            allowed: Some(allowed),
            target_tags: vec!["web".into()],
        }
    }

    fn ports(exposure: &IngressExposure) -> Vec<String> {
        exposure
            .grants
            .iter()
            .map(|grant| match grant {
                PortGrant::Port(token) => token.to_string(),
                PortGrant::FullyOpen(_) => "full".to_string(),
            })
            .collect()
    }

    #[test]
    fn test_rejects_non_public_rules() {
        let base = rule(vec![entry("tcp", Some(&["22"]))]);

        let mut disabled = base.clone();
        disabled.disabled = true;
        assert!(classify(&disabled).is_none());

        let mut egress = base.clone();
        egress.direction = Direction::Egress;
        assert!(classify(&egress).is_none());

        let mut no_allowed = base.clone();
        no_allowed.allowed = None;
        assert!(classify(&no_allowed).is_none());

        let mut no_sources = base.clone();
        no_sources.source_ranges = None;
        assert!(classify(&no_sources).is_none());

        let mut private = base.clone();
        private.source_ranges = Some(vec!["10.0.0.0/8".into()]);
        assert!(classify(&private).is_none());

        assert!(classify(&base).is_some());
    }

    #[test]
    fn test_emits_listed_ports() {
        let exposure = classify(&rule(vec![entry("tcp", Some(&["80", "443", "8000-9000"]))])).unwrap();
        assert_eq!(exposure.network.as_str(), "projects/p/global/networks/default");
        assert_eq!(ports(&exposure), vec!["80", "443", "8000-9000"]);
    }

    #[test]
    fn test_skips_icmp() {
        let exposure = classify(&rule(vec![entry("icmp", None), entry("tcp", Some(&["22"]))])).unwrap();
        assert_eq!(ports(&exposure), vec!["22"]);
    }

    #[test]
    fn test_protocol_without_ports_is_fully_open_and_stops() {
        let exposure = classify(&rule(vec![
            entry("tcp", Some(&["22"])),
            entry("all", None),
            entry("udp", Some(&["53"])),
        ]))
        .unwrap();
        assert_eq!(ports(&exposure), vec!["22", "full"]);
        assert_eq!(
            exposure.grants[1],
            PortGrant::FullyOpen(entry("all", None))
        );
    }

    #[test]
    fn test_only_icmp_yields_empty_exposure() {
        let exposure = classify(&rule(vec![entry("icmp", None)])).unwrap();
        assert!(exposure.grants.is_empty());
    }

    #[test]
    fn test_numeric_protocol_is_split_into_port_tokens() {
        // Malformed upstream shape: no ports, protocol is not a name.
        let exposure = classify(&rule(vec![entry("6,17", None)])).unwrap();
        assert_eq!(ports(&exposure), vec!["6", "17"]);
    }

    #[test]
    fn test_comma_joined_protocol_names_open_the_network() {
        let exposure = classify(&rule(vec![
            entry("tcp", Some(&["443"])),
            entry("tcp,udp", None),
            entry("tcp", Some(&["22"])),
        ]))
        .unwrap();
        assert_eq!(ports(&exposure), vec!["443", "full"]);
        assert_eq!(exposure.grants[1], PortGrant::FullyOpen(entry("tcp,udp", None)));
    }

    #[test]
    fn test_mixed_protocol_drops_unparseable_pieces() {
        let exposure = classify(&rule(vec![
            entry("6,tcp6,70000", None),
            entry("tcp", Some(&["22", "ssh", "70000"])),
        ]))
        .unwrap();
        assert_eq!(ports(&exposure), vec!["6", "22"]);
    }

    #[test]
    fn test_entry_without_protocol_is_skipped() {
        let mut broken = entry("tcp", Some(&["80"]));
        broken.protocol = None;
        let exposure = classify(&rule(vec![broken, entry("tcp", Some(&["22"]))])).unwrap();
        assert_eq!(ports(&exposure), vec!["22"]);
    }

    #[test]
    fn test_numeric_ports_are_accepted() {
        let allowed = AllowedEntry {
            protocol: Some("tcp".into()),
            ports: Some(vec![Scalar::Number(8080)]),
        };
        let exposure = classify(&rule(vec![allowed])).unwrap();
        assert_eq!(ports(&exposure), vec!["8080"]);
    }

    #[test]
    fn test_is_protocol_name() {
        assert!(is_protocol_name("tcp"));
        assert!(is_protocol_name("all"));
        assert!(is_protocol_name("ip-in-ip"));
        assert!(!is_protocol_name(""));
        assert!(!is_protocol_name("6"));
        assert!(is_protocol_name("tcp,udp"));
        assert!(!is_protocol_name("6,17"));
        assert!(!is_protocol_name("tcp6"));
    }
}
