pub mod channel;
pub mod endpoint;
pub mod hosts;
pub mod peer;
pub mod prelude;

// Pipeline stages run by a seed session, in order: the connector establishes a channel, the
// handshake negotiates versions, then the keep-alive and the address exchange run side by side.
pub mod address_exchange;
pub mod connector;
pub mod handshake;
pub mod keep_alive;

// linear backoff sends `Execute` to the seeder until it reports success
pub mod linear_backoff;

pub use channel::Channel;
pub use endpoint::SeedEndpoint;
pub use hosts::{HostSet, Hosts};
