//! # Network Models
//!
//! * [`id::NetworkId`]: the join key between firewall rules and instances.
//! * [`range::PortToken`]: a single port or an inclusive port range.
//! * [`port_set::PortRangeSet`]: the merged exposed ports of one network.

pub mod id;
pub mod port_set;
pub mod range;
