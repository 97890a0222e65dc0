use super::prelude::*;

/// Requests addresses from a seed and stores them in the host set.
pub trait AddressExchange: Send + Sync {
    /// Subscribes to the channel immediately. The returned future resolves only after every
    /// received address has been inserted into `hosts`.
    fn start(
        &self,
        channel: Arc<dyn Channel>,
        deadline: Duration,
        hosts: Arc<dyn HostSet>,
        self_address: NetworkAddress,
    ) -> BoxFuture<'static, Result<()>>;
}

/// Announces our own address, asks the seed for its addresses, stores the first `Address` reply
/// and stops the channel, since a seed is not kept as a regular peer.
#[derive(Debug, Clone, Default)]
pub struct SeedExchange;

impl SeedExchange {
    pub fn new() -> Self {
        SeedExchange
    }
}

impl AddressExchange for SeedExchange {
    fn start(
        &self,
        channel: Arc<dyn Channel>,
        deadline: Duration,
        hosts: Arc<dyn HostSet>,
        self_address: NetworkAddress,
    ) -> BoxFuture<'static, Result<()>> {
        let mut replies = channel.subscribe(MessageKind::Address);
        Box::pin(async move {
            if hosts.capacity() == 0 {
                channel.stop();
                return Ok(());
            }
            let announce = !self_address.ip.ip().is_unspecified();
            let exchange = async {
                if announce {
                    channel.send(Message::Address(vec![self_address.clone()])).await?;
                }
                channel.send(Message::GetAddress).await?;
                match replies.recv().await {
                    Some(Message::Address(addresses)) => Ok(addresses),
                    _ => Err(Error::ChannelStopped),
                }
            };
            let result = match timeout(deadline, exchange).await {
                Ok(Ok(addresses)) => {
                    let received = addresses.len();
                    let inserted = addresses
                        .into_iter()
                        .filter(|address| address.ip != self_address.ip)
                        .filter(|address| hosts.insert(address.clone()))
                        .count();
                    info!(
                        "[{}] {} sent {} addresses, {} new {}",
                        "seed".green(),
                        channel.address(),
                        received,
                        inserted,
                        "✓".green()
                    );
                    Ok(())
                }
                Ok(Err(err)) => Err(Error::AddressExchange(format!("{}", err))),
                Err(_) => Err(Error::AddressExchange("timed out".to_string())),
            };
            channel.stop();
            result
        })
    }
}
