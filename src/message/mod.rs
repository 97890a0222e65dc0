//! Protocol message definitions.
mod address;
mod inventory;
mod ping;
mod version;

pub use address::{unix_time, NetworkAddress};
pub use inventory::{GetData, InventoryKind, InventoryVector};
pub use ping::{Ping, Pong};
pub use version::{Version, VersionAck, MINIMUM_VERSION, PROTOCOL_VERSION, USER_AGENT};
