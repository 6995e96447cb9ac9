//! # Port Range Set
//!
//! The exposed ports of one network, kept as a list of [`PortToken`]s that is
//! always sorted by the tokens' text (`"443" < "80" < "8000-9000"`).
//!
//! Insertion is a greedy single pass over the existing entries:
//! * an incoming range that falls entirely inside an existing range is a no-op,
//! * an incoming range that overlaps an existing range extends it,
//! * existing entries swallowed by a wider incoming range are dropped,
//! * a single port already covered by an entry is a no-op.
//!
//! Adjacent entries are never fused: inserting `10` next to `1-9` keeps both.

use super::range::PortToken;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PortRangeSet {
    tokens: Vec<PortToken>,
}

impl PortRangeSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// The `{"1-65535"}` sentinel.
    pub fn fully_open() -> Self {
        Self {
            tokens: vec![PortToken::FULL],
        }
    }

    pub fn is_fully_open(&self) -> bool {
        self.tokens == [PortToken::FULL]
    }

    /// Inserts `incoming`, returning `true` if the set changed.
    pub fn insert(&mut self, incoming: PortToken) -> bool {
        if self.is_fully_open() {
            return false;
        }
        let merged: Vec<PortToken> = merge(&self.tokens, incoming);
        if merged == self.tokens {
            return false;
        }
        self.tokens = merged;
        true
    }

    pub fn covers(&self, port: u16) -> bool {
        self.tokens.iter().any(|token| token.contains(port))
    }

    pub fn as_slice(&self) -> &[PortToken] {
        &self.tokens
    }

    pub fn iter(&self) -> impl Iterator<Item = &PortToken> {
        self.tokens.iter()
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    pub fn to_vec(&self) -> Vec<PortToken> {
        self.tokens.clone()
    }
}

impl FromIterator<PortToken> for PortRangeSet {
    fn from_iter<I: IntoIterator<Item = PortToken>>(iter: I) -> Self {
        let mut set = PortRangeSet::new();
        for token in iter {
            set.insert(token);
        }
        set
    }
}

/// Merges `incoming` into `existing` and returns the sorted result.
///
/// `existing` is assumed sorted; when the insertion is absorbed the
/// returned list is identical to it.
pub fn merge(existing: &[PortToken], incoming: PortToken) -> Vec<PortToken> {
    let mut merged: Vec<PortToken> = Vec::with_capacity(existing.len() + 1);

    match incoming {
        PortToken::Range { low, high } => {
            let mut extended: bool = false;

            for &entry in existing {
                match entry {
                    PortToken::Range {
                        low: e_low,
                        high: e_high,
                    } => {
                        if low > e_high || high < e_low {
                            merged.push(entry);
                        } else if e_low <= low && low <= e_high {
                            if high <= e_high {
                                return sorted(existing.to_vec());
                            }
                            merged.push(PortToken::Range { low: e_low, high });
                            extended = true;
                        } else if e_high >= high {
                            merged.push(PortToken::Range { low, high: e_high });
                            extended = true;
                        }
                        // Otherwise the entry lies inside the incoming range and is dropped.
                    }
                    PortToken::Single(port) => {
                        if !incoming.contains(port) {
                            merged.push(entry);
                        }
                    }
                }
            }

            if !extended {
                merged.push(incoming);
            }
        }
        PortToken::Single(port) => {
            for &entry in existing {
                let covered: bool = match entry {
                    PortToken::Range { .. } => entry.contains(port),
                    PortToken::Single(existing_port) => existing_port == port,
                };
                if covered {
                    return sorted(existing.to_vec());
                }
                merged.push(entry);
            }
            merged.push(incoming);
        }
    }

    sorted(merged)
}

fn sorted(mut tokens: Vec<PortToken>) -> Vec<PortToken> {
    tokens.sort_by_cached_key(|token| token.to_string());
    tokens
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝
