//! Wallet connection and signing for EIP-1193 browser providers.
//!
//! Connects a page to an injected wallet (`window.ethereum`), keeps track of
//! the connected account, signs a URL-supplied payload with `personal_sign`,
//! and relays the account and the signature to the adapter server.
//!
//! # Components
//!
//! - [`ProviderDetector`]: finds the injected provider, flags co-installed wallets
//! - [`NetworkWatcher`]: reloads the page on any `chainChanged`
//! - [`AccountSession`]: reconciles account lists, reports new accounts
//! - [`connect::request_accounts`]: EIP-1102 permission request
//! - [`SignFlow`]: hex-encodes the payload and requests a signature
//! - [`Reporter`]: pushes `/address` and `/signature` reports; [`Outbox`] keeps
//!   them off the event loop
//!
//! [`Adapter`] wires them together and serializes provider events and user
//! actions through one queue. The provider, the page surface and the reporter
//! are traits, so the state machine runs the same in the browser and in tests.
//!
//! # Features
//!
//! - `full` (default): [`HttpReporter`] and the native polling [`AdapterClient`]
//! - `wasm`: state machine only, for the browser bindings

pub mod adapter;
pub mod config;
pub mod connect;
pub mod constants;
pub mod detect;
pub mod error;
pub mod network;
pub mod provider;
pub mod report;
pub mod session;
pub mod sign;
pub mod surface;

#[cfg(feature = "full")]
pub mod client;
#[cfg(feature = "full")]
pub mod http_reporter;

// Re-exports
pub use adapter::{Adapter, AdapterHandle, Exit, Flow, Input};
pub use config::{AdapterConfig, DetectOptions, ReportConfig};
pub use constants::*;
pub use detect::{Detected, ProviderDetector};
pub use error::{AdapterError, ProviderRpcError};
pub use network::{NetworkState, NetworkWatcher};
pub use provider::{
    EventHandler, Provider, ProviderEvent, ProviderEventKind, ProviderSource, RequestArguments,
};
pub use report::{EthAddress, Outbox, Report, Reporter, Signature};
pub use session::{AccountSession, Reconciliation};
pub use sign::{encode_message, payload_from_query, DeploySignState, PendingSignature, SignFlow};
pub use surface::Surface;

#[cfg(feature = "full")]
pub use client::{AdapterClient, PollOptions};
#[cfg(feature = "full")]
pub use http_reporter::HttpReporter;
