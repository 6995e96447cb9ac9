use exposr_common::network::port_set::PortRangeSet;
use exposr_common::scan::ScanDescriptor;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};

use super::address::AddressIndex;
use super::exposure::ExposureIndex;

/// Joins exposure and addresses per network into scan descriptors.
pub struct ScanConfigBuilder<'a> {
    exposure: &'a ExposureIndex,
    addresses: &'a AddressIndex,
}

impl<'a> ScanConfigBuilder<'a> {
    pub fn new(exposure: &'a ExposureIndex, addresses: &'a AddressIndex) -> Self {
        Self {
            exposure,
            addresses,
        }
    }

    /// One descriptor per network with both external addresses and public
    /// ports, in network order.
    pub fn descriptors(&self) -> Vec<ScanDescriptor> {
        self.addresses
            .iter()
            .filter(|(_, ips)| !ips.is_empty())
            .filter_map(|(network, ips)| {
                let ports: &PortRangeSet = self.exposure.ports(network)?;
                if ports.is_empty() {
                    return None;
                }
                Some(ScanDescriptor::new(network.clone(), ips.clone(), ports.to_vec()))
            })
            .collect()
    }

    /// Descriptors with the network order shuffled, so neighbouring targets
    /// are not scanned back to back.
    pub fn build<R: Rng + ?Sized>(&self, rng: &mut R) -> Vec<ScanDescriptor> {
        let mut descriptors: Vec<ScanDescriptor> = self.descriptors();
        descriptors.shuffle(rng);
        descriptors
    }

    /// [`Self::build`] with a seeded generator, or the thread generator when
    /// no seed is given.
    pub fn build_shuffled(&self, seed: Option<u64>) -> Vec<ScanDescriptor> {
        match seed {
            Some(seed) => self.build(&mut StdRng::seed_from_u64(seed)),
            None => self.build(&mut rand::rng()),
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
