use super::tx::Transaction;

use crate::zfx_id::Id;
use crate::Result;

#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
pub struct BlockHeader {
    pub version: u32,
    pub previous: Id,
    pub merkle: Id,
    pub timestamp: u32,
    pub nonce: u32,
}

#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
pub struct Block {
    pub header: BlockHeader,
    pub transactions: Vec<Transaction>,
}

impl std::fmt::Display for Block {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "block(prev {}, {} txs)", self.header.previous, self.transactions.len())
    }
}

impl Block {
    pub fn new(header: BlockHeader, transactions: Vec<Transaction>) -> Block {
        Block { header, transactions }
    }

    /// The block is identified by the hash of its header only.
    pub fn hash(&self) -> Result<Id> {
        let encoded = bincode::serialize(&self.header)?;
        Ok(Id::new(&encoded))
    }
}
