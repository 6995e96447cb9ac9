//! # Port Token Model
//!
//! A port token is either a single TCP port (`"443"`) or an inclusive
//! range (`"8000-9000"`), exactly as firewall rules spell them.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const MIN_PORT: u16 = 1;
pub const MAX_PORT: u16 = 65535;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PortTokenError {
    #[error("empty port token")]
    Empty,
    #[error("'{0}' is not a port number")]
    NotANumber(String),
    #[error("port {0} is outside {MIN_PORT}-{MAX_PORT}")]
    OutOfRange(u64),
}

/// A single port or an inclusive port range.
///
/// Ranges are stored with `low <= high`; a reversed token such as `"90-80"`
/// is normalized on parse.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum PortToken {
    Single(u16),
    Range { low: u16, high: u16 },
}

impl PortToken {
    /// Every port, the "fully open" sentinel.
    pub const FULL: PortToken = PortToken::Range {
        low: MIN_PORT,
        high: MAX_PORT,
    };

    pub fn range(a: u16, b: u16) -> Self {
        PortToken::Range {
            low: a.min(b),
            high: a.max(b),
        }
    }

    /// Inclusive bounds, a single port being the degenerate range `[p, p]`.
    pub fn bounds(&self) -> (u16, u16) {
        match *self {
            PortToken::Single(port) => (port, port),
            PortToken::Range { low, high } => (low, high),
        }
    }

    pub fn contains(&self, port: u16) -> bool {
        let (low, high) = self.bounds();
        low <= port && port <= high
    }

    pub fn is_range(&self) -> bool {
        matches!(self, PortToken::Range { .. })
    }
}

impl fmt::Display for PortToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PortToken::Single(port) => write!(f, "{port}"),
            PortToken::Range { low, high } => write!(f, "{low}-{high}"),
        }
    }
}

impl FromStr for PortToken {
    type Err = PortTokenError;

    /// Parses `"N"` or `"N-M"`. Surrounding whitespace is ignored.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s: &str = s.trim();
        if s.is_empty() {
            return Err(PortTokenError::Empty);
        }

        match s.split_once('-') {
            Some((low_str, high_str)) => {
                let low: u16 = parse_port(low_str)?;
                let high: u16 = parse_port(high_str)?;
                Ok(PortToken::range(low, high))
            }
            None => Ok(PortToken::Single(parse_port(s)?)),
        }
    }
}

impl TryFrom<String> for PortToken {
    type Error = PortTokenError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<PortToken> for String {
    fn from(token: PortToken) -> Self {
        token.to_string()
    }
}

fn parse_port(s: &str) -> Result<u16, PortTokenError> {
    let s: &str = s.trim();
    if s.is_empty() || !s.bytes().all(|b| b.is_ascii_digit()) {
        return Err(PortTokenError::NotANumber(s.to_string()));
    }

    let value: u64 = s
        .parse::<u64>()
        .map_err(|_| PortTokenError::NotANumber(s.to_string()))?;

    if value < MIN_PORT as u64 || value > MAX_PORT as u64 {
        return Err(PortTokenError::OutOfRange(value));
    }
    Ok(value as u16)
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝
