use ethereum_adapter::{EthAddress, Signature};
use tokio::sync::RwLock;

/// Last values reported by the page. Process-local; a restart forgets them.
#[derive(Debug, Default)]
pub struct AdapterState {
    pub address: RwLock<Option<EthAddress>>,
    pub signature: RwLock<Option<Signature>>,
}

impl AdapterState {
    pub fn new() -> Self {
        Self::default()
    }
}
