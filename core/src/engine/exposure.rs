use std::collections::BTreeMap;

use exposr_common::asset::{AllowedEntry, FirewallRule};
use exposr_common::network::id::NetworkId;
use exposr_common::network::port_set::PortRangeSet;

use super::filter::{self, PortGrant};

/// A rule that opens every port of its network to the internet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OpenRuleEvent {
    pub network: NetworkId,
    pub rule: String,
    pub rule_id: Option<String>,
    pub target_tags: Vec<String>,
    pub entry: AllowedEntry,
}

/// Publicly exposed ports per network, folded over every firewall rule.
#[derive(Debug, Default)]
pub struct ExposureIndex {
    networks: BTreeMap<NetworkId, PortRangeSet>,
    open_rules: Vec<OpenRuleEvent>,
}

impl ExposureIndex {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_rules<'a>(rules: impl IntoIterator<Item = &'a FirewallRule>) -> Self {
        let mut index = Self::new();
        for rule in rules {
            index.add_rule(rule);
        }
        index
    }

    /// A public rule registers its network even when it grants nothing
    /// (e.g. ICMP only); such networks keep an empty set.
    pub fn add_rule(&mut self, rule: &FirewallRule) {
        let Some(exposure) = filter::classify(rule) else {
            return;
        };

        let ports: &mut PortRangeSet = self.networks.entry(exposure.network).or_default();

        for grant in exposure.grants {
            match grant {
                PortGrant::FullyOpen(entry) => {
                    *ports = PortRangeSet::fully_open();
                    self.open_rules.push(OpenRuleEvent {
                        network: rule.network.clone(),
                        rule: rule.name.clone(),
                        rule_id: rule.id.as_ref().map(ToString::to_string),
                        target_tags: rule.target_tags.clone(),
                        entry,
                    });
                }
                PortGrant::Port(token) => {
                    ports.insert(token);
                }
            }
        }
    }

    pub fn ports(&self, network: &NetworkId) -> Option<&PortRangeSet> {
        self.networks.get(network)
    }

    pub fn open_rules(&self) -> &[OpenRuleEvent] {
        &self.open_rules
    }

    pub fn iter(&self) -> impl Iterator<Item = (&NetworkId, &PortRangeSet)> {
        self.networks.iter()
    }

    pub fn len(&self) -> usize {
        self.networks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.networks.is_empty()
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
