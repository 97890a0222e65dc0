use super::prelude::*;

use crate::message::{Version, VersionAck, MINIMUM_VERSION};

use rand::Rng;

/// Negotiates versions on a freshly connected channel.
pub trait Handshake: Send + Sync {
    /// Subscribes to the channel immediately, so it must be called before the channel is started.
    /// The returned future resolves once negotiation succeeded, failed or ran past `deadline`.
    fn start(&self, channel: Arc<dyn Channel>, deadline: Duration) -> BoxFuture<'static, Result<()>>;
}

/// The `Version`/`VersionAck` exchange: both sides announce a `Version` and acknowledge the
/// other's. The handshake succeeds once our acknowledgement has been sent and the peer's received.
#[derive(Debug, Clone)]
pub struct VersionHandshake {
    self_address: NetworkAddress,
    start_height: u32,
    relay: bool,
}

impl VersionHandshake {
    pub fn new(self_address: NetworkAddress, start_height: u32, relay: bool) -> Self {
        VersionHandshake { self_address, start_height, relay }
    }
}

fn handshake_error(err: Error) -> Error {
    match err {
        Error::Handshake(_) => err,
        other => Error::Handshake(format!("{}", other)),
    }
}

impl Handshake for VersionHandshake {
    fn start(&self, channel: Arc<dyn Channel>, deadline: Duration) -> BoxFuture<'static, Result<()>> {
        let mut versions = channel.subscribe(MessageKind::Version);
        let mut acks = channel.subscribe(MessageKind::VersionAck);
        let nonce: u64 = rand::thread_rng().gen();
        let receiver = NetworkAddress::new(channel.address(), 0);
        let version = Version::new(receiver, self.self_address.clone(), nonce, self.start_height, self.relay);
        Box::pin(async move {
            let negotiation = async {
                channel.send(Message::Version(version)).await?;
                let mut peer_version: Option<Version> = None;
                let mut acknowledged = false;
                while peer_version.is_none() || !acknowledged {
                    tokio::select! {
                        message = versions.recv(), if peer_version.is_none() => match message {
                            Some(Message::Version(version)) => {
                                if version.version < MINIMUM_VERSION {
                                    return Err(Error::Handshake(format!("version {} is below the minimum", version.version)));
                                }
                                if version.nonce == nonce {
                                    return Err(Error::Handshake("connected to self".to_string()));
                                }
                                channel.send(Message::VersionAck(VersionAck)).await?;
                                peer_version = Some(version);
                            }
                            _ => return Err(Error::ChannelStopped),
                        },
                        message = acks.recv(), if !acknowledged => match message {
                            Some(_) => acknowledged = true,
                            None => return Err(Error::ChannelStopped),
                        },
                    }
                }
                Ok(peer_version)
            };
            match timeout(deadline, negotiation).await {
                Ok(Ok(Some(version))) => {
                    debug!(
                        "[{}] {} speaks {} ({}) at height {}",
                        "handshake".cyan(),
                        channel.address(),
                        version.version,
                        version.user_agent,
                        version.start_height
                    );
                    Ok(())
                }
                Ok(Ok(None)) => Err(Error::Handshake("no peer version".to_string())),
                Ok(Err(err)) => Err(handshake_error(err)),
                Err(_) => Err(Error::Handshake("timed out".to_string())),
            }
        })
    }
}
