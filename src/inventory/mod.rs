//! Serving peers' requests for previously advertised transactions and blocks.
mod pool;
mod responder;

pub use pool::{Blockchain, MemoryPool, TransactionPool};
pub use responder::InventoryResponder;
