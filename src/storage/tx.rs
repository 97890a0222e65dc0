use crate::chain::Transaction;
use crate::zfx_id::Id;
use crate::Result;

/// Inserts a tx into storage under its hash, returning the hash.
pub fn insert_tx(tree: &sled::Tree, tx: &Transaction) -> Result<Id> {
    let hash = tx.hash()?;
    let encoded = bincode::serialize(tx)?;
    let _ = tree.insert(hash.as_bytes(), encoded)?;
    Ok(hash)
}

/// Fetches a tx by hash.
pub fn get_tx(tree: &sled::Tree, hash: &Id) -> Result<Option<Transaction>> {
    match tree.get(hash.as_bytes())? {
        Some(v) => Ok(Some(bincode::deserialize(&v)?)),
        None => Ok(None),
    }
}
