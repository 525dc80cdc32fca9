use crate::constants::METHOD_CHAIN_ID;
use crate::provider::{Provider, RequestArguments};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum NetworkState {
    #[default]
    Stable,
    /// Terminal: the page is being reloaded.
    Reloading,
}

/// Watches the chain id. Any change reloads the page.
#[derive(Debug, Default)]
pub struct NetworkWatcher {
    state: NetworkState,
    chain_id: Option<String>,
}

impl NetworkWatcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Read the chain id once at startup. A failure is only logged.
    pub async fn load<P: Provider>(&mut self, provider: &P) {
        match provider.request(RequestArguments::new(METHOD_CHAIN_ID)).await {
            Ok(value) => {
                let chain_id = match value {
                    serde_json::Value::String(id) => id,
                    other => other.to_string(),
                };
                tracing::debug!(%chain_id, "chain id");
                self.chain_id = Some(chain_id);
            }
            Err(e) => tracing::error!(error = %e, "eth_chainId failed"),
        }
    }

    /// Handle `chainChanged`. Always moves to [`NetworkState::Reloading`],
    /// whether or not the id actually differs.
    pub fn chain_changed(&mut self, chain_id: &str) {
        tracing::info!(
            from = self.chain_id.as_deref().unwrap_or("unknown"),
            to = chain_id,
            "chain changed, reloading"
        );
        self.chain_id = Some(chain_id.to_string());
        self.state = NetworkState::Reloading;
    }

    pub fn state(&self) -> NetworkState {
        self.state
    }

    pub fn chain_id(&self) -> Option<&str> {
        self.chain_id.as_deref()
    }
}
