//! Database storage layer using [`sled`](http://docs.rs/sled/) as backend
use crate::chain::{Block, Transaction};
use crate::inventory::Blockchain;
use crate::zfx_id::Id;
use crate::Result;

use futures::future::BoxFuture;

use std::path::Path;

/// Block storage related routines
pub mod block;
/// Transaction storage related routines
pub mod tx;

/// Confirmed transactions and blocks, each in its own tree keyed by hash.
#[derive(Debug, Clone)]
pub struct ChainStore {
    transactions: sled::Tree,
    blocks: sled::Tree,
}

impl ChainStore {
    pub fn open(path: impl AsRef<Path>) -> Result<ChainStore> {
        ChainStore::with_db(sled::open(path)?)
    }

    /// A store removed from disk once dropped.
    pub fn temporary() -> Result<ChainStore> {
        ChainStore::with_db(sled::Config::new().temporary(true).open()?)
    }

    fn with_db(db: sled::Db) -> Result<ChainStore> {
        let transactions = db.open_tree("transactions")?;
        let blocks = db.open_tree("blocks")?;
        Ok(ChainStore { transactions, blocks })
    }

    pub fn insert_transaction(&self, tx: &Transaction) -> Result<Id> {
        tx::insert_tx(&self.transactions, tx)
    }

    pub fn insert_block(&self, block: &Block) -> Result<Id> {
        block::insert_block(&self.blocks, block)
    }

    pub fn get_transaction(&self, hash: &Id) -> Result<Option<Transaction>> {
        tx::get_tx(&self.transactions, hash)
    }

    pub fn get_block(&self, hash: &Id) -> Result<Option<Block>> {
        block::get_block(&self.blocks, hash)
    }
}

impl Blockchain for ChainStore {
    fn lookup_transaction(&self, hash: Id) -> BoxFuture<'static, Result<Option<Transaction>>> {
        let found = self.get_transaction(&hash);
        Box::pin(async move { found })
    }

    fn lookup_block(&self, hash: Id) -> BoxFuture<'static, Result<Option<Block>>> {
        let found = self.get_block(&hash);
        Box::pin(async move { found })
    }
}
