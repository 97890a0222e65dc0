use crate::chain::{Block, Transaction};
use crate::zfx_id::Id;
use crate::Result;

use futures::future::BoxFuture;

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};

/// Unconfirmed transactions known to the node.
pub trait TransactionPool: Send + Sync {
    fn lookup(&self, hash: Id) -> BoxFuture<'static, Result<Option<Transaction>>>;
}

/// Confirmed transactions and blocks.
pub trait Blockchain: Send + Sync {
    fn lookup_transaction(&self, hash: Id) -> BoxFuture<'static, Result<Option<Transaction>>>;

    fn lookup_block(&self, hash: Id) -> BoxFuture<'static, Result<Option<Block>>>;
}

/// An in-memory transaction pool keyed by transaction hash.
#[derive(Debug, Default)]
pub struct MemoryPool {
    transactions: Mutex<HashMap<Id, Transaction>>,
}

impl MemoryPool {
    pub fn new() -> Self {
        MemoryPool::default()
    }

    /// Adds `tx` to the pool, returning its hash.
    pub fn insert(&self, tx: Transaction) -> Result<Id> {
        let hash = tx.hash()?;
        let _ = self.lock().insert(hash, tx);
        Ok(hash)
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<Id, Transaction>> {
        self.transactions.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl TransactionPool for MemoryPool {
    fn lookup(&self, hash: Id) -> BoxFuture<'static, Result<Option<Transaction>>> {
        let tx = self.lock().get(&hash).cloned();
        Box::pin(async move { Ok(tx) })
    }
}
