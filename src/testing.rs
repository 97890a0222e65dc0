//! In-memory channels and scripted pipeline stages for exercising sessions and responders without
//! a network.
use crate::message::{NetworkAddress, Version, VersionAck, PROTOCOL_VERSION};
use crate::p2p::address_exchange::AddressExchange;
use crate::p2p::channel::{Channel, Subscribers, Subscription};
use crate::p2p::connector::Connector;
use crate::p2p::handshake::Handshake;
use crate::p2p::hosts::HostSet;
use crate::p2p::keep_alive::KeepAlive;
use crate::p2p::SeedEndpoint;
use crate::protocol::{Message, MessageKind};
use crate::{Error, Result};

use futures::future::BoxFuture;
use tokio::sync::mpsc;
use tokio::time::{timeout, Duration};

use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

/// `n` distinct peer addresses.
pub fn addresses(n: usize) -> Vec<NetworkAddress> {
    (0..n).map(|i| NetworkAddress::new(format!("10.1.{}.{}:8333", i / 250, i % 250 + 1).parse().unwrap(), 1)).collect()
}

/// A channel whose inbound messages are delivered by the test and whose outbound messages are
/// recorded. Replies can be scripted per outbound message kind.
pub struct MemoryChannel {
    address: SocketAddr,
    subscribers: Subscribers,
    started: AtomicBool,
    stopped: AtomicBool,
    sent: Mutex<Vec<Message>>,
    outbox: mpsc::UnboundedSender<Message>,
    outbox_rx: tokio::sync::Mutex<mpsc::UnboundedReceiver<Message>>,
    replies: Mutex<HashMap<MessageKind, Vec<Message>>>,
}

impl MemoryChannel {
    pub fn new(address: &str) -> Arc<MemoryChannel> {
        let (outbox, outbox_rx) = mpsc::unbounded_channel();
        Arc::new(MemoryChannel {
            address: address.parse().unwrap(),
            subscribers: Subscribers::new(),
            started: AtomicBool::new(false),
            stopped: AtomicBool::new(false),
            sent: Mutex::new(vec![]),
            outbox,
            outbox_rx: tokio::sync::Mutex::new(outbox_rx),
            replies: Mutex::new(HashMap::new()),
        })
    }

    /// A channel which answers like a well-behaved seed: a version handshake followed by
    /// `addresses` in reply to `GetAddress`.
    pub fn seed(address: &str, addresses: Vec<NetworkAddress>) -> Arc<MemoryChannel> {
        let channel = MemoryChannel::new(address);
        let sender = NetworkAddress::new(channel.address, 1);
        let receiver = NetworkAddress::new("127.0.0.1:8333".parse().unwrap(), 1);
        let mut version = Version::new(receiver, sender, 0, 100, false);
        version.version = PROTOCOL_VERSION;
        channel.respond(MessageKind::Version, vec![Message::Version(version), Message::VersionAck(VersionAck)]);
        channel.respond(MessageKind::GetAddress, vec![Message::Address(addresses)]);
        channel
    }

    pub fn respond(&self, kind: MessageKind, messages: Vec<Message>) {
        self.replies.lock().unwrap().insert(kind, messages);
    }

    pub fn deliver(&self, message: Message) {
        self.subscribers.notify(message);
    }

    pub fn sent(&self) -> Vec<Message> {
        self.sent.lock().unwrap().clone()
    }

    pub fn started(&self) -> bool {
        self.started.load(Ordering::SeqCst)
    }

    /// Waits up to `within` for the next outbound message.
    pub async fn next_sent(&self, within: Duration) -> Option<Message> {
        let mut outbox = self.outbox_rx.lock().await;
        timeout(within, outbox.recv()).await.ok().flatten()
    }
}

impl Channel for MemoryChannel {
    fn address(&self) -> SocketAddr {
        self.address
    }

    fn start(&self) {
        self.started.store(true, Ordering::SeqCst);
    }

    fn stop(&self) {
        self.stopped.store(true, Ordering::SeqCst);
        self.subscribers.close();
    }

    fn stopped(&self) -> bool {
        self.stopped.load(Ordering::SeqCst)
    }

    fn send(&self, message: Message) -> BoxFuture<'static, Result<()>> {
        if self.stopped() {
            return Box::pin(async { Err(Error::ChannelStopped) });
        }
        let kind = message.kind();
        self.sent.lock().unwrap().push(message.clone());
        let _ = self.outbox.send(message);
        let replies = self.replies.lock().unwrap().get(&kind).cloned().unwrap_or_default();
        for reply in replies {
            self.subscribers.notify(reply);
        }
        Box::pin(async { Ok(()) })
    }

    fn subscribe(&self, kind: MessageKind) -> Subscription {
        self.subscribers.subscribe(kind)
    }
}

/// What the scripted connector does for one seed host.
#[derive(Clone)]
pub enum ConnectOutcome {
    Refuse,
    Accept(Arc<MemoryChannel>),
    /// Never resolves.
    Stall,
}

#[derive(Default)]
pub struct ScriptedConnector {
    outcomes: Mutex<HashMap<String, ConnectOutcome>>,
    attempts: AtomicUsize,
}

impl ScriptedConnector {
    pub fn new() -> Arc<ScriptedConnector> {
        Arc::new(ScriptedConnector::default())
    }

    pub fn script(&self, host: &str, outcome: ConnectOutcome) {
        self.outcomes.lock().unwrap().insert(host.to_string(), outcome);
    }

    pub fn attempts(&self) -> usize {
        self.attempts.load(Ordering::SeqCst)
    }
}

impl Connector for ScriptedConnector {
    fn connect(&self, seed: &SeedEndpoint, _deadline: Duration) -> BoxFuture<'static, Result<Arc<dyn Channel>>> {
        self.attempts.fetch_add(1, Ordering::SeqCst);
        let outcome = self.outcomes.lock().unwrap().get(seed.host()).cloned().unwrap_or(ConnectOutcome::Refuse);
        Box::pin(async move {
            match outcome {
                ConnectOutcome::Refuse => Err(Error::Connect("refused".to_string())),
                ConnectOutcome::Accept(channel) => Ok(channel as Arc<dyn Channel>),
                ConnectOutcome::Stall => futures::future::pending().await,
            }
        })
    }
}

/// Succeeds for every channel except those whose address was marked as failing.
#[derive(Default)]
pub struct ScriptedHandshake {
    failing: Mutex<Vec<SocketAddr>>,
}

impl ScriptedHandshake {
    pub fn new() -> Arc<ScriptedHandshake> {
        Arc::new(ScriptedHandshake::default())
    }

    pub fn fail(&self, address: &str) {
        self.failing.lock().unwrap().push(address.parse().unwrap());
    }
}

impl Handshake for ScriptedHandshake {
    fn start(&self, channel: Arc<dyn Channel>, _deadline: Duration) -> BoxFuture<'static, Result<()>> {
        let fails = self.failing.lock().unwrap().contains(&channel.address());
        Box::pin(async move {
            tokio::task::yield_now().await;
            if fails {
                Err(Error::Handshake("rejected".to_string()))
            } else {
                Ok(())
            }
        })
    }
}

#[derive(Default)]
pub struct CountingKeepAlive {
    attached: AtomicUsize,
}

impl CountingKeepAlive {
    pub fn new() -> Arc<CountingKeepAlive> {
        Arc::new(CountingKeepAlive::default())
    }

    pub fn attached(&self) -> usize {
        self.attached.load(Ordering::SeqCst)
    }
}

impl KeepAlive for CountingKeepAlive {
    fn start(&self, _channel: Arc<dyn Channel>, _heartbeat: Duration) {
        self.attached.fetch_add(1, Ordering::SeqCst);
    }
}

/// Inserts a scripted list of addresses for each channel address, then completes.
#[derive(Default)]
pub struct ScriptedExchange {
    yields: Mutex<HashMap<SocketAddr, Vec<NetworkAddress>>>,
}

impl ScriptedExchange {
    pub fn new() -> Arc<ScriptedExchange> {
        Arc::new(ScriptedExchange::default())
    }

    pub fn script(&self, address: &str, addresses: Vec<NetworkAddress>) {
        self.yields.lock().unwrap().insert(address.parse().unwrap(), addresses);
    }
}

impl AddressExchange for ScriptedExchange {
    fn start(
        &self,
        channel: Arc<dyn Channel>,
        _deadline: Duration,
        hosts: Arc<dyn HostSet>,
        _self_address: NetworkAddress,
    ) -> BoxFuture<'static, Result<()>> {
        let addresses = self.yields.lock().unwrap().get(&channel.address()).cloned().unwrap_or_default();
        Box::pin(async move {
            tokio::task::yield_now().await;
            for address in addresses {
                hosts.insert(address);
            }
            channel.stop();
            Ok(())
        })
    }
}
