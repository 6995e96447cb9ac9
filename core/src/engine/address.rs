use std::collections::BTreeMap;
use std::net::IpAddr;

use exposr_common::asset::Instance;
use exposr_common::network::id::NetworkId;
use tracing::warn;

/// External (NAT) addresses per network, in the order instances list them.
#[derive(Debug, Default)]
pub struct AddressIndex {
    networks: BTreeMap<NetworkId, Vec<IpAddr>>,
}

impl AddressIndex {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_instances<'a>(instances: impl IntoIterator<Item = &'a Instance>) -> Self {
        let mut index = Self::new();
        for instance in instances {
            index.add_instance(instance);
        }
        index
    }

    pub fn add_instance(&mut self, instance: &Instance) {
        for interface in &instance.network_interfaces {
            let Some(network) = &interface.network else {
                warn!(instance = %instance.name, "skipping interface without a network");
                continue;
            };
            for config in &interface.access_configs {
                let Some(raw) = config.nat_ip.as_deref() else {
                    continue;
                };
                match raw.trim().parse::<IpAddr>() {
                    Ok(ip) => self
                        .networks
                        .entry(network.clone())
                        .or_default()
                        .push(ip),
                    Err(e) => warn!(
                        instance = %instance.name,
                        network = %network,
                        nat_ip = raw,
                        "skipping NAT IP: {e}"
                    ),
                }
            }
        }
    }

    pub fn addresses(&self, network: &NetworkId) -> Option<&[IpAddr]> {
        self.networks.get(network).map(Vec::as_slice)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&NetworkId, &Vec<IpAddr>)> {
        self.networks.iter()
    }

    pub fn len(&self) -> usize {
        self.networks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.networks.is_empty()
    }
}
