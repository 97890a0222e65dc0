//! The connection handle shared by the protocols attached to one peer.
use crate::protocol::{Message, MessageKind};
use crate::Result;

use futures::future::BoxFuture;
use tokio::sync::mpsc;

use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::Mutex;

/// The receiving end of a subscription. It yields every message of the subscribed kind and ends
/// once the channel stops.
pub type Subscription = mpsc::UnboundedReceiver<Message>;

/// An established link to a peer.
///
/// A channel is shared (`Arc<dyn Channel>`) between the session that created it and the protocols
/// attached to it, any of which may outlive the session. Protocols subscribe before the channel is
/// started so that no message is read before its subscriber exists.
pub trait Channel: Send + Sync {
    /// The remote address of the peer.
    fn address(&self) -> SocketAddr;

    /// Begins reading from the peer. Starting a started channel has no effect.
    fn start(&self);

    /// Stops the channel, ending every subscription.
    fn stop(&self);

    fn stopped(&self) -> bool;

    fn send(&self, message: Message) -> BoxFuture<'static, Result<()>>;

    fn subscribe(&self, kind: MessageKind) -> Subscription;
}

#[derive(Default)]
struct Registry {
    closed: bool,
    senders: HashMap<MessageKind, Vec<mpsc::UnboundedSender<Message>>>,
}

/// Fans inbound messages out to the subscribers of their kind.
#[derive(Default)]
pub struct Subscribers {
    registry: Mutex<Registry>,
}

impl Subscribers {
    pub fn new() -> Self {
        Subscribers::default()
    }

    pub fn subscribe(&self, kind: MessageKind) -> Subscription {
        let (sender, receiver) = mpsc::unbounded_channel();
        let mut registry = lock(&self.registry);
        // A closed registry drops the sender at once, ending the subscription.
        if !registry.closed {
            registry.senders.entry(kind).or_insert_with(Vec::new).push(sender);
        }
        receiver
    }

    /// Delivers `message` to every live subscriber of its kind and returns how many received it.
    pub fn notify(&self, message: Message) -> usize {
        let mut registry = lock(&self.registry);
        match registry.senders.get_mut(&message.kind()) {
            Some(senders) => {
                senders.retain(|sender| sender.send(message.clone()).is_ok());
                senders.len()
            }
            None => 0,
        }
    }

    /// Drops every subscriber and refuses new ones.
    pub fn close(&self) {
        let mut registry = lock(&self.registry);
        registry.closed = true;
        registry.senders.clear();
    }
}

fn lock<T>(mutex: &Mutex<T>) -> std::sync::MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}
