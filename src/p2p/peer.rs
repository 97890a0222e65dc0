//! A [Channel] over a TCP stream, framed with a length-delimited codec and bincode.
use super::channel::{Channel, Subscribers, Subscription};
use super::prelude::*;

use futures::{SinkExt, TryStreamExt};
use tokio::net::tcp::{OwnedReadHalf, OwnedWriteHalf};
use tokio::net::TcpStream;
use tokio::sync::{Mutex, Notify};
use tokio_serde::formats::Bincode;
use tokio_serde::Framed;
use tokio_util::codec::{FramedRead, FramedWrite, LengthDelimitedCodec};

use std::net::SocketAddr;
use std::sync::atomic::{AtomicBool, Ordering};

type Reader = Framed<FramedRead<OwnedReadHalf, LengthDelimitedCodec>, Message, Message, Bincode<Message, Message>>;

type Writer = Framed<FramedWrite<OwnedWriteHalf, LengthDelimitedCodec>, Message, Message, Bincode<Message, Message>>;

struct Inner {
    address: SocketAddr,
    reader: std::sync::Mutex<Option<Reader>>,
    writer: Mutex<Writer>,
    subscribers: Subscribers,
    stopped: AtomicBool,
    shutdown: Notify,
}

impl Inner {
    fn stop(&self) {
        if !self.stopped.swap(true, Ordering::AcqRel) {
            debug!("[{}] stopping {}", "peer".cyan(), self.address);
            self.subscribers.close();
            self.shutdown.notify_one();
        }
    }
}

/// A peer connected over TCP.
#[derive(Clone)]
pub struct Peer {
    inner: Arc<Inner>,
}

impl Peer {
    pub fn new(stream: TcpStream) -> Result<Peer> {
        let address = stream.peer_addr()?;
        let (read_half, write_half) = stream.into_split();
        let reader = Framed::new(FramedRead::new(read_half, LengthDelimitedCodec::new()), Bincode::default());
        let writer = Framed::new(FramedWrite::new(write_half, LengthDelimitedCodec::new()), Bincode::default());
        let inner = Inner {
            address,
            reader: std::sync::Mutex::new(Some(reader)),
            writer: Mutex::new(writer),
            subscribers: Subscribers::new(),
            stopped: AtomicBool::new(false),
            shutdown: Notify::new(),
        };
        Ok(Peer { inner: Arc::new(inner) })
    }

    pub async fn connect(address: SocketAddr) -> Result<Peer> {
        let stream = TcpStream::connect(address).await?;
        Peer::new(stream)
    }
}

async fn read_loop(inner: Arc<Inner>, mut reader: Reader) {
    loop {
        tokio::select! {
            _ = inner.shutdown.notified() => break,
            frame = reader.try_next() => match frame {
                Ok(Some(message)) => {
                    let kind = message.kind();
                    if inner.subscribers.notify(message) == 0 {
                        debug!("[{}] {} sent unhandled {:?}", "peer".cyan(), inner.address, kind);
                    }
                }
                Ok(None) => {
                    debug!("[{}] {} closed the connection", "peer".cyan(), inner.address);
                    break;
                }
                Err(err) => {
                    warn!("[{}] {} read error: {:?}", "peer".cyan(), inner.address, err);
                    break;
                }
            }
        }
    }
    inner.stop();
    let _ = inner.writer.lock().await.close().await;
}

impl Channel for Peer {
    fn address(&self) -> SocketAddr {
        self.inner.address
    }

    fn start(&self) {
        let reader = self.inner.reader.lock().unwrap_or_else(|poisoned| poisoned.into_inner()).take();
        if let Some(reader) = reader {
            tokio::spawn(read_loop(self.inner.clone(), reader));
        }
    }

    fn stop(&self) {
        self.inner.stop()
    }

    fn stopped(&self) -> bool {
        self.inner.stopped.load(Ordering::Acquire)
    }

    fn send(&self, message: Message) -> BoxFuture<'static, Result<()>> {
        let inner = self.inner.clone();
        Box::pin(async move {
            if inner.stopped.load(Ordering::Acquire) {
                return Err(Error::ChannelStopped);
            }
            let mut writer = inner.writer.lock().await;
            writer.send(message).await.map_err(Error::IO)
        })
    }

    fn subscribe(&self, kind: MessageKind) -> Subscription {
        self.inner.subscribers.subscribe(kind)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::message::Ping;

    use tokio::net::TcpListener;

    async fn pair() -> (Peer, Peer) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let address = listener.local_addr().unwrap();
        let (accepted, connected) = tokio::join!(listener.accept(), Peer::connect(address));
        let (stream, _) = accepted.unwrap();
        (Peer::new(stream).unwrap(), connected.unwrap())
    }

    #[actix_rt::test]
    async fn test_send_reaches_subscriber() {
        let (server, client) = pair().await;
        let mut pings = server.subscribe(MessageKind::Ping);
        server.start();
        client.start();

        client.send(Message::Ping(Ping::new(42))).await.unwrap();
        let received = timeout(Duration::from_secs(5), pings.recv()).await.unwrap();
        assert_eq!(received, Some(Message::Ping(Ping::new(42))));
    }

    #[actix_rt::test]
    async fn test_remote_close_stops_channel() {
        let (server, client) = pair().await;
        let mut pings = server.subscribe(MessageKind::Ping);
        server.start();
        client.start();

        client.stop();
        assert!(client.send(Message::GetAddress).await.is_err());
        let ended = timeout(Duration::from_secs(5), pings.recv()).await.unwrap();
        assert_eq!(ended, None);
        assert!(server.stopped());
    }
}
