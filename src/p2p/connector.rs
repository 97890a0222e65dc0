use super::peer::Peer;
use super::prelude::*;

use tokio::net::{lookup_host, TcpStream};

/// Establishes the transport link to a seed.
pub trait Connector: Send + Sync {
    /// Connects to `seed`, failing with `Error::Connect` or `Error::Timeout` once `deadline` has
    /// elapsed. The returned channel is not yet started.
    fn connect(&self, seed: &SeedEndpoint, deadline: Duration) -> BoxFuture<'static, Result<Arc<dyn Channel>>>;
}

/// Connects over plain TCP, trying each resolved address of the seed in turn.
#[derive(Debug, Clone, Default)]
pub struct TcpConnector;

impl TcpConnector {
    pub fn new() -> Self {
        TcpConnector
    }
}

async fn connect_any(seed: SeedEndpoint) -> Result<TcpStream> {
    let addresses =
        lookup_host((seed.host(), seed.port())).await.map_err(|err| Error::Connect(format!("{}", err)))?;
    let mut last_error = Error::Connect(format!("{} did not resolve", seed));
    for address in addresses {
        match TcpStream::connect(address).await {
            Ok(stream) => return Ok(stream),
            Err(err) => {
                debug!("[{}] {} via {}: {}", "connector".cyan(), seed, address, err);
                last_error = Error::Connect(format!("{}", err));
            }
        }
    }
    Err(last_error)
}

impl Connector for TcpConnector {
    fn connect(&self, seed: &SeedEndpoint, deadline: Duration) -> BoxFuture<'static, Result<Arc<dyn Channel>>> {
        let seed = seed.clone();
        Box::pin(async move {
            match timeout(deadline, connect_any(seed)).await {
                Ok(result) => {
                    let peer = Peer::new(result?)?;
                    Ok(Arc::new(peer) as Arc<dyn Channel>)
                }
                Err(_) => Err(Error::Timeout),
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use tokio::net::TcpListener;

    #[actix_rt::test]
    async fn test_connect_to_listener() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let port = listener.local_addr().unwrap().port();
        let seed = SeedEndpoint::new("127.0.0.1", port);
        let (channel, _accepted) =
            tokio::join!(TcpConnector::new().connect(&seed, Duration::from_secs(5)), listener.accept());
        let channel = channel.unwrap();
        assert_eq!(channel.address().port(), port);
        assert!(!channel.stopped());
    }

    #[actix_rt::test]
    async fn test_connect_refused() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let port = listener.local_addr().unwrap().port();
        drop(listener);
        let seed = SeedEndpoint::new("127.0.0.1", port);
        match TcpConnector::new().connect(&seed, Duration::from_secs(5)).await {
            Err(Error::Connect(_)) | Err(Error::Timeout) => (),
            Err(err) => panic!("unexpected error {:?}", err),
            Ok(_) => panic!("connected to a closed port"),
        }
    }
}
