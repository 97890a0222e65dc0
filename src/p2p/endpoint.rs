use crate::{Error, Result};

use std::fmt;
use std::str::FromStr;

/// A well-known seed node, contacted only to discover further peer addresses.
#[derive(Debug, Clone, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub struct SeedEndpoint {
    host: String,
    port: u16,
}

impl SeedEndpoint {
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        SeedEndpoint { host: host.into(), port }
    }

    pub fn host(&self) -> &str {
        &self.host
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    /// The seeds of the main network.
    pub fn mainnet() -> Vec<SeedEndpoint> {
        vec![
            SeedEndpoint::new("seed.bitnodes.io", 8333),
            SeedEndpoint::new("seed.bitcoinstats.com", 8333),
            SeedEndpoint::new("seed.bitcoin.sipa.be", 8333),
            SeedEndpoint::new("dnsseed.bluematt.me", 8333),
            SeedEndpoint::new("seed.bitcoin.jonasschnelli.ch", 8333),
            SeedEndpoint::new("dnsseed.bitcoin.dashjr.org", 8333),
        ]
    }

    /// The seeds of the test network.
    pub fn testnet() -> Vec<SeedEndpoint> {
        vec![
            SeedEndpoint::new("testnet-seed.alexykot.me", 18333),
            SeedEndpoint::new("testnet-seed.bitcoin.petertodd.org", 18333),
            SeedEndpoint::new("testnet-seed.bluematt.me", 18333),
            SeedEndpoint::new("testnet-seed.bitcoin.schildbach.de", 18333),
        ]
    }
}

impl fmt::Display for SeedEndpoint {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        if self.host.contains(':') {
            write!(f, "[{}]:{}", self.host, self.port)
        } else {
            write!(f, "{}:{}", self.host, self.port)
        }
    }
}

impl FromStr for SeedEndpoint {
    type Err = Error;

    /// Parses a seed description of the form `HOST:PORT`, with IPv6 hosts in brackets as in
    /// `[::1]:8333`.
    fn from_str(s: &str) -> Result<SeedEndpoint> {
        let (host, port) = s.rsplit_once(':').ok_or(Error::PeerParseError)?;
        let host = match host.strip_prefix('[') {
            Some(literal) => literal.strip_suffix(']').ok_or(Error::PeerParseError)?,
            None => host,
        };
        if host.is_empty() {
            return Err(Error::PeerParseError);
        }
        let port: u16 = port.parse().map_err(|_| Error::PeerParseError)?;
        Ok(SeedEndpoint::new(host, port))
    }
}
