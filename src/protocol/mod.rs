//! The node network message protocol.
//!
//! Every frame on a peer channel carries exactly one [Message]. Subscribers register interest in a
//! [MessageKind] and receive every message of that kind read from the channel.
use crate::chain::{Block, Transaction};
use crate::message::{GetData, NetworkAddress, Ping, Pong, Version, VersionAck};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Message {
    // Handshake
    Version(Version),
    VersionAck(VersionAck),
    // Keep-alive
    Ping(Ping),
    Pong(Pong),
    // Address exchange
    GetAddress,
    Address(Vec<NetworkAddress>),
    // Inventory
    GetData(GetData),
    Transaction(Transaction),
    Block(Block),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MessageKind {
    Version,
    VersionAck,
    Ping,
    Pong,
    GetAddress,
    Address,
    GetData,
    Transaction,
    Block,
}

impl Message {
    pub fn kind(&self) -> MessageKind {
        match self {
            Message::Version(_) => MessageKind::Version,
            Message::VersionAck(_) => MessageKind::VersionAck,
            Message::Ping(_) => MessageKind::Ping,
            Message::Pong(_) => MessageKind::Pong,
            Message::GetAddress => MessageKind::GetAddress,
            Message::Address(_) => MessageKind::Address,
            Message::GetData(_) => MessageKind::GetData,
            Message::Transaction(_) => MessageKind::Transaction,
            Message::Block(_) => MessageKind::Block,
        }
    }
}
