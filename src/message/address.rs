use std::hash::{Hash, Hasher};
use std::net::SocketAddr;
use std::time::{SystemTime, UNIX_EPOCH};

/// A peer address as advertised on the network.
///
/// Two addresses are the same peer when their socket addresses match; the timestamp and service
/// bits are informational only.
#[derive(Debug, Clone, Eq, Serialize, Deserialize)]
pub struct NetworkAddress {
    /// Last time the peer was seen, in unix seconds.
    pub timestamp: u32,
    /// The service bits the peer advertises.
    pub services: u64,
    pub ip: SocketAddr,
}

impl PartialEq for NetworkAddress {
    fn eq(&self, other: &Self) -> bool {
        self.ip == other.ip
    }
}

impl Hash for NetworkAddress {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.ip.hash(state);
    }
}

impl std::fmt::Display for NetworkAddress {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "{}", self.ip)
    }
}

impl NetworkAddress {
    pub fn new(ip: SocketAddr, services: u64) -> Self {
        NetworkAddress { timestamp: unix_time(), services, ip }
    }
}

/// Current unix time in seconds, saturating at zero for clocks set before the epoch.
pub fn unix_time() -> u32 {
    SystemTime::now().duration_since(UNIX_EPOCH).map(|d| d.as_secs() as u32).unwrap_or(0)
}
