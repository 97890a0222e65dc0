use crate::chain::Block;
use crate::zfx_id::Id;
use crate::Result;

/// Inserts a block under the hash of its header, returning the hash.
pub fn insert_block(tree: &sled::Tree, block: &Block) -> Result<Id> {
    let hash = block.hash()?;
    let encoded = bincode::serialize(block)?;
    let _ = tree.insert(hash.as_bytes(), encoded)?;
    Ok(hash)
}

/// Fetches a block by hash.
pub fn get_block(tree: &sled::Tree, hash: &Id) -> Result<Option<Block>> {
    match tree.get(hash.as_bytes())? {
        Some(v) => Ok(Some(bincode::deserialize(&v)?)),
        None => Ok(None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chain::{BlockHeader, Transaction};

    #[test]
    fn test_insert_and_get() {
        let db = sled::Config::new().temporary(true).open().unwrap();
        let tree = db.open_tree("blocks").unwrap();
        let header = BlockHeader { version: 1, previous: Id::zero(), merkle: Id::new(b"root"), timestamp: 0, nonce: 0 };
        let block = Block::new(header, vec![Transaction::new(1, vec![1], 0)]);
        let hash = insert_block(&tree, &block).unwrap();
        assert_eq!(hash, block.hash().unwrap());
        assert_eq!(get_block(&tree, &hash).unwrap(), Some(block));
    }
}
