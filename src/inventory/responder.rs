use super::pool::{Blockchain, TransactionPool};

use crate::colored::Colorize;
use crate::message::{InventoryKind, InventoryVector};
use crate::p2p::channel::{Channel, Subscription};
use crate::protocol::{Message, MessageKind};
use crate::{Error, Result};

use tokio::task::JoinHandle;

use std::sync::Arc;

use tracing::debug;

/// Answers `GetData` requests on monitored channels from the transaction pool and the chain.
///
/// Every requested vector is resolved in its own task, so replies to one request may be sent in
/// any order. Vectors which cannot be resolved are dropped without a reply.
#[derive(Clone)]
pub struct InventoryResponder {
    pool: Arc<dyn TransactionPool>,
    chain: Arc<dyn Blockchain>,
}

impl InventoryResponder {
    pub fn new(pool: Arc<dyn TransactionPool>, chain: Arc<dyn Blockchain>) -> Self {
        InventoryResponder { pool, chain }
    }

    /// Serves `GetData` requests arriving on `channel` until it stops.
    pub fn monitor(&self, channel: Arc<dyn Channel>) -> JoinHandle<()> {
        let requests = channel.subscribe(MessageKind::GetData);
        self.serve(channel, requests)
    }

    /// Serves an existing `GetData` subscription of `channel`. Requests queued on the
    /// subscription before this call are answered first.
    pub fn serve(&self, channel: Arc<dyn Channel>, requests: Subscription) -> JoinHandle<()> {
        tokio::spawn(self.clone().answer(channel, requests))
    }

    async fn answer(self, channel: Arc<dyn Channel>, mut requests: Subscription) {
        while let Some(message) = requests.recv().await {
            if let Message::GetData(request) = message {
                debug!("[{}] {} requested {} items", "getdata".cyan(), channel.address(), request.inventories.len());
                for inventory in request.inventories {
                    tokio::spawn(self.clone().respond(channel.clone(), inventory));
                }
            }
        }
        debug!("[{}] stopped monitoring {}", "getdata".cyan(), channel.address());
    }

    async fn respond(self, channel: Arc<dyn Channel>, inventory: InventoryVector) {
        match self.resolve(inventory).await {
            Ok(message) => {
                if let Err(err) = channel.send(message).await {
                    debug!("[{}] reply to {} failed: {:?}", "getdata".yellow(), channel.address(), err);
                }
            }
            Err(err) => debug!("[{}] {:?} {}: {:?}", "getdata".yellow(), inventory.kind, inventory.hash, err),
        }
    }

    /// Looks up the content named by `inventory`. Transactions are looked up in the pool first,
    /// then in the chain. Returns `Err(Error::NotFound)` when the content is unknown, and lookup
    /// errors are treated as absence.
    pub async fn resolve(&self, inventory: InventoryVector) -> Result<Message> {
        match inventory.kind {
            InventoryKind::Transaction => {
                if let Some(tx) = found(self.pool.lookup(inventory.hash).await) {
                    return Ok(Message::Transaction(tx));
                }
                found(self.chain.lookup_transaction(inventory.hash).await).map(Message::Transaction).ok_or(Error::NotFound)
            }
            InventoryKind::Block => {
                found(self.chain.lookup_block(inventory.hash).await).map(Message::Block).ok_or(Error::NotFound)
            }
        }
    }
}

fn found<T>(lookup: Result<Option<T>>) -> Option<T> {
    match lookup {
        Ok(item) => item,
        Err(err) => {
            debug!("[{}] lookup failed: {:?}", "getdata".yellow(), err);
            None
        }
    }
}
