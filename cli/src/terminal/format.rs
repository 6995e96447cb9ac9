use std::net::IpAddr;

use colored::*;
use exposr_common::network::range::PortToken;
use exposr_common::scan::ScanDescriptor;
use exposr_core::engine::exposure::OpenRuleEvent;
use exposr_core::evaluate::Finding;
use exposr_core::probe::ProbeIntensity;

use crate::terminal::colors;

pub type Detail = (String, ColoredString);

/// Addresses beyond this are summarized as a count.
const MAX_LISTED_IPS: usize = 4;

pub fn ips_to_value(ips: &[IpAddr]) -> ColoredString {
    let listed: Vec<String> = ips
        .iter()
        .take(MAX_LISTED_IPS)
        .map(|ip| match ip {
            IpAddr::V4(v4) => v4.to_string().color(colors::IPV4_ADDR).to_string(),
            IpAddr::V6(v6) => v6.to_string().color(colors::IPV6_ADDR).to_string(),
        })
        .collect();

    let mut value: String = listed.join(" ");
    if ips.len() > MAX_LISTED_IPS {
        value.push_str(&format!(" (+{} more)", ips.len() - MAX_LISTED_IPS));
    }
    value.normal()
}

pub fn ports_to_value(ports: &[PortToken]) -> ColoredString {
    if ports == [PortToken::FULL] {
        return "1-65535 (fully open)".color(colors::FULLY_OPEN).bold();
    }
    ports
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<String>>()
        .join(",")
        .color(colors::PORT)
}

pub fn descriptor_to_details(descriptor: &ScanDescriptor) -> Vec<Detail> {
    let intensity: ProbeIntensity = ProbeIntensity::for_ports(&descriptor.ports);
    vec![
        (
            "Network".to_string(),
            descriptor.network.as_str().color(colors::NETWORK),
        ),
        ("IPs".to_string(), ips_to_value(&descriptor.ips)),
        ("Ports".to_string(), ports_to_value(&descriptor.ports)),
        (
            "Probe".to_string(),
            intensity.to_string().color(colors::SECONDARY),
        ),
    ]
}

pub fn open_rule_to_details(event: &OpenRuleEvent) -> Vec<Detail> {
    let mut details: Vec<Detail> = vec![
        ("Network".to_string(), event.network.as_str().color(colors::NETWORK)),
        ("Allowed".to_string(), event.entry.to_string().color(colors::FULLY_OPEN)),
    ];
    if let Some(id) = &event.rule_id {
        details.push(("Rule ID".to_string(), id.as_str().normal()));
    }
    if !event.target_tags.is_empty() {
        details.push(("Tags".to_string(), event.target_tags.join(", ").normal()));
    }
    details
}

pub fn finding_to_details(finding: &Finding) -> Vec<Detail> {
    let mut details: Vec<Detail> = vec![(
        "Port".to_string(),
        format!("{}/{}", finding.port, finding.protocol).color(colors::PORT),
    )];
    if let Some(project) = &finding.project {
        details.push(("Project".to_string(), project.as_str().normal()));
    }
    if let Some(network) = &finding.network {
        details.push(("Network".to_string(), network.as_str().color(colors::NETWORK)));
    }
    details.push(("Script".to_string(), finding.script_id.as_str().color(colors::ACCENT)));
    details
}
