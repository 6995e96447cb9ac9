//! The **exposure aggregation engine**.
//!
//! A pure, synchronous fold over already-fetched asset records:
//!
//! 1. [`filter`] keeps ingress rules open to `0.0.0.0/0` and turns their
//!    clauses into port grants.
//! 2. [`exposure::ExposureIndex`] merges those grants per network.
//! 3. [`address::AddressIndex`] collects NAT IPs per network.
//! 4. [`builder::ScanConfigBuilder`] joins both and shuffles the networks.
//!
//! Fetching assets and emitting descriptors belong to [`crate::source`] and
//! [`crate::sink`].

use exposr_common::asset::{FirewallRule, Instance};
use exposr_common::scan::ScanDescriptor;
use tracing::info;

pub mod address;
pub mod builder;
pub mod exposure;
pub mod filter;

use address::AddressIndex;
use builder::ScanConfigBuilder;
use exposure::ExposureIndex;

/// Everything one aggregation run produced.
#[derive(Debug)]
pub struct Aggregation {
    pub exposure: ExposureIndex,
    pub addresses: AddressIndex,
    pub descriptors: Vec<ScanDescriptor>,
}

/// Runs the whole fold: rules and instances in, shuffled descriptors out.
pub fn aggregate(rules: &[FirewallRule], instances: &[Instance], seed: Option<u64>) -> Aggregation {
    let exposure: ExposureIndex = ExposureIndex::from_rules(rules);
    info!(
        "{} publicly exposed network(s) across {} firewall rule(s)",
        exposure.len(),
        rules.len()
    );

    let addresses: AddressIndex = AddressIndex::from_instances(instances);
    info!(
        "{} network(s) with external addresses across {} instance(s)",
        addresses.len(),
        instances.len()
    );

    let descriptors: Vec<ScanDescriptor> =
        ScanConfigBuilder::new(&exposure, &addresses).build_shuffled(seed);

    Aggregation {
        exposure,
        addresses,
        descriptors,
    }
}
