//! Chain payloads served to peers: transactions and blocks.
mod block;
mod tx;

pub use block::{Block, BlockHeader};
pub use tx::Transaction;
