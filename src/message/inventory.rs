use crate::zfx_id::Id;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum InventoryKind {
    Transaction,
    Block,
}

/// Identifies a transaction or block a peer may request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct InventoryVector {
    pub kind: InventoryKind,
    pub hash: Id,
}

impl InventoryVector {
    pub fn transaction(hash: Id) -> Self {
        InventoryVector { kind: InventoryKind::Transaction, hash }
    }

    pub fn block(hash: Id) -> Self {
        InventoryVector { kind: InventoryKind::Block, hash }
    }
}

/// A peer's request for the full content of previously advertised inventory.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GetData {
    pub inventories: Vec<InventoryVector>,
}

impl GetData {
    pub fn new(inventories: Vec<InventoryVector>) -> Self {
        GetData { inventories }
    }
}
