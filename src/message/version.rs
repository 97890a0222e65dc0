//! The network version message definition.
use super::address::{unix_time, NetworkAddress};

/// The protocol version this node speaks.
pub const PROTOCOL_VERSION: u32 = 60001;
/// Peers announcing a lower version are disconnected during the handshake.
pub const MINIMUM_VERSION: u32 = 31402;
pub const USER_AGENT: &str = "/zfx-seed:0.1.0/";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Version {
    pub version: u32,
    pub services: u64,
    pub timestamp: u32,
    pub address_receiver: NetworkAddress,
    pub address_sender: NetworkAddress,
    pub nonce: u64,
    pub user_agent: String,
    pub start_height: u32,
    pub relay: bool,
}

impl Version {
    pub fn new(
        receiver: NetworkAddress,
        sender: NetworkAddress,
        nonce: u64,
        start_height: u32,
        relay: bool,
    ) -> Self {
        Version {
            version: PROTOCOL_VERSION,
            services: sender.services,
            timestamp: unix_time(),
            address_receiver: receiver,
            address_sender: sender,
            nonce,
            user_agent: USER_AGENT.to_string(),
            start_height,
            relay,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VersionAck;
