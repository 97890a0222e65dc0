use crate::zfx_id::Id;
use crate::Result;

#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    pub version: u32,
    pub payload: Vec<u8>,
    pub lock_time: u32,
}

impl std::fmt::Display for Transaction {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "tx(v{}, {} bytes)", self.version, self.payload.len())
    }
}

impl Transaction {
    pub fn new(version: u32, payload: Vec<u8>, lock_time: u32) -> Transaction {
        Transaction { version, payload, lock_time }
    }

    pub fn hash(&self) -> Result<Id> {
        let encoded = bincode::serialize(self)?;
        Ok(Id::new(&encoded))
    }
}
