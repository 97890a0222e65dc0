use crate::colored::Colorize;
use crate::inventory::InventoryResponder;
use crate::message::NetworkAddress;
use crate::p2p::channel::Subscription;
use crate::p2p::handshake::Handshake;
use crate::p2p::keep_alive::KeepAlive;
use crate::p2p::peer::Peer;
use crate::p2p::{Channel, HostSet, Hosts};
use crate::protocol::{Message, MessageKind};
use crate::session::Timeouts;
use crate::Result;

use tokio::net::{TcpListener, TcpStream};

use std::net::SocketAddr;
use std::sync::Arc;

use tracing::{debug, info, warn};

/// The maximum number of addresses sent in reply to one `GetAddress`.
pub const ADDRESS_LIMIT: usize = 1000;

/// Implements a server for handling incoming connections.
///
/// Each accepted connection is handshaken first. Once the handshake succeeds the connection is
/// kept alive, served addresses from the host set and answered on inventory requests until the
/// peer goes away.
#[derive(Clone)]
pub struct Server {
    /// The ip address which this server binds to.
    ip: SocketAddr,
    hosts: Arc<Hosts>,
    handshake: Arc<dyn Handshake>,
    keep_alive: Arc<dyn KeepAlive>,
    responder: InventoryResponder,
    timeouts: Timeouts,
}

impl Server {
    pub fn new(
        ip: SocketAddr,
        hosts: Arc<Hosts>,
        handshake: Arc<dyn Handshake>,
        keep_alive: Arc<dyn KeepAlive>,
        responder: InventoryResponder,
        timeouts: Timeouts,
    ) -> Server {
        Server { ip, hosts, handshake, keep_alive, responder, timeouts }
    }

    pub async fn listen(self) -> Result<()> {
        let listener = TcpListener::bind(self.ip).await?;
        self.serve(listener).await
    }

    /// Accepts connections on an already bound listener.
    pub async fn serve(self, listener: TcpListener) -> Result<()> {
        info!("listening on {:?}", listener.local_addr()?);
        loop {
            let (stream, address) = listener.accept().await?;
            debug!("[{}] accepted {}", "server".cyan(), address);
            tokio::spawn(self.clone().handle(stream));
        }
    }

    async fn handle(self, stream: TcpStream) {
        let peer: Arc<dyn Channel> = match Peer::new(stream) {
            Ok(peer) => Arc::new(peer),
            Err(err) => {
                warn!("[{}] {:?}", "server".yellow(), err);
                return;
            }
        };
        // Requests may follow the handshake immediately, so every subscription precedes `start`.
        // None of them is served before the handshake succeeds.
        let requests = peer.subscribe(MessageKind::GetAddress);
        let announcements = peer.subscribe(MessageKind::Address);
        let inventory_requests = peer.subscribe(MessageKind::GetData);
        let handshake = self.handshake.start(peer.clone(), self.timeouts.handshake);
        peer.start();
        if let Err(err) = handshake.await {
            debug!("[{}] {} {:?}", "server".yellow(), peer.address(), err);
            peer.stop();
            return;
        }
        info!("[{}] {} connected {}", "server".cyan(), peer.address(), "✓".green());
        let _ = self.responder.serve(peer.clone(), inventory_requests);
        self.keep_alive.start(peer.clone(), self.timeouts.heartbeat);
        serve_addresses(peer, self.hosts, requests, announcements).await;
    }
}

/// Answers `GetAddress` from the host set and learns the addresses peers announce.
async fn serve_addresses(
    peer: Arc<dyn Channel>,
    hosts: Arc<Hosts>,
    mut requests: Subscription,
    mut announcements: Subscription,
) {
    loop {
        // Announcements first, so an address announced ahead of a request is in the reply.
        tokio::select! {
            biased;
            announcement = announcements.recv() => match announcement {
                Some(Message::Address(addresses)) => {
                    let learned = addresses.into_iter().filter(|address| hosts.insert(address.clone())).count();
                    debug!("[{}] learned {} addresses from {}", "server".cyan(), learned, peer.address());
                }
                Some(_) => (),
                None => break,
            },
            request = requests.recv() => match request {
                Some(_) => {
                    let addresses: Vec<NetworkAddress> = hosts.sample(ADDRESS_LIMIT);
                    debug!("[{}] sending {} addresses to {}", "server".cyan(), addresses.len(), peer.address());
                    if peer.send(Message::Address(addresses)).await.is_err() {
                        break;
                    }
                }
                None => break,
            },
        }
    }
    debug!("[{}] {} disconnected", "server".cyan(), peer.address());
}
