//! The EIP-1193 provider capability and its event model.
//!
//! - [`Provider`]: `request` plus `on` subscription, implemented over
//!   `window.ethereum` in the browser and by in-memory fakes in tests
//! - [`ProviderSource`]: where a provider is looked up (the page environment)
//! - [`ProviderEvent`]: typed payloads for the events the adapter listens to

use std::future::Future;
use std::time::Duration;

use serde::Serialize;
use serde_json::Value;

use crate::constants::{EVENT_ACCOUNTS_CHANGED, EVENT_CHAIN_CHANGED};
use crate::error::ProviderRpcError;

/// Arguments of a single `request({ method, params })` call.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct RequestArguments {
    pub method: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub params: Option<Vec<Value>>,
}

impl RequestArguments {
    pub fn new(method: &str) -> Self {
        Self {
            method: method.to_string(),
            params: None,
        }
    }

    pub fn with_params(method: &str, params: Vec<Value>) -> Self {
        Self {
            method: method.to_string(),
            params: Some(params),
        }
    }
}

/// Provider events the adapter subscribes to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ProviderEventKind {
    ChainChanged,
    AccountsChanged,
}

impl ProviderEventKind {
    pub const ALL: [ProviderEventKind; 2] = [
        ProviderEventKind::ChainChanged,
        ProviderEventKind::AccountsChanged,
    ];

    /// Event name as passed to `provider.on(...)`.
    pub fn name(&self) -> &'static str {
        match self {
            ProviderEventKind::ChainChanged => EVENT_CHAIN_CHANGED,
            ProviderEventKind::AccountsChanged => EVENT_ACCOUNTS_CHANGED,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum ProviderEvent {
    ChainChanged(String),
    AccountsChanged(Vec<String>),
}

impl ProviderEvent {
    pub fn kind(&self) -> ProviderEventKind {
        match self {
            ProviderEvent::ChainChanged(_) => ProviderEventKind::ChainChanged,
            ProviderEvent::AccountsChanged(_) => ProviderEventKind::AccountsChanged,
        }
    }

    /// Build a typed event from the raw JSON payload a provider emitted.
    pub fn from_payload(kind: ProviderEventKind, payload: Value) -> Result<Self, String> {
        match kind {
            ProviderEventKind::ChainChanged => match payload {
                Value::String(id) => Ok(ProviderEvent::ChainChanged(id)),
                // Some legacy providers emit the chain id as a number.
                Value::Number(n) => Ok(ProviderEvent::ChainChanged(n.to_string())),
                other => Err(format!("chainChanged payload is not a chain id: {other}")),
            },
            ProviderEventKind::AccountsChanged => serde_json::from_value(payload)
                .map(ProviderEvent::AccountsChanged)
                .map_err(|e| format!("accountsChanged payload is not an account list: {e}")),
        }
    }
}

/// Handler registered with [`Provider::on`]. Lives as long as the page.
pub type EventHandler = Box<dyn FnMut(ProviderEvent)>;

/// EIP-1193 provider capability.
///
/// Browsers run everything on one thread, so neither the trait nor its
/// futures require `Send`.
pub trait Provider {
    /// Issue an RPC request; the result is the raw JSON value.
    fn request(
        &self,
        args: RequestArguments,
    ) -> impl Future<Output = Result<Value, ProviderRpcError>>;

    /// Subscribe to an event. Handlers must be called in emission order and
    /// never re-entrantly.
    fn on(&self, kind: ProviderEventKind, handler: EventHandler);

    /// Whether the provider identifies itself as MetaMask (`isMetaMask`).
    fn is_metamask(&self) -> bool {
        false
    }

    /// Identity comparison (`provider === window.ethereum`).
    fn same_instance(&self, other: &Self) -> bool;
}

/// The environment a provider is discovered in.
pub trait ProviderSource {
    type Provider: Provider;

    /// Look for an injected provider once.
    fn probe(&self) -> Option<Self::Provider>;

    /// The process-wide ambient reference (`window.ethereum`).
    fn ambient(&self) -> Option<Self::Provider>;

    /// Wait between probes.
    fn sleep(&self, duration: Duration) -> impl Future<Output = ()>;
}
