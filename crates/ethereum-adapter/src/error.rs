use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::constants::{
    CODE_CHAIN_DISCONNECTED, CODE_DISCONNECTED, CODE_UNAUTHORIZED, CODE_UNSUPPORTED_METHOD,
    CODE_USER_REJECTED,
};

/// Error object rejected by an EIP-1193 `request` call.
///
/// Providers are loose about the shape: `code` may be missing and `message`
/// may be empty, so both default.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize, Error)]
#[error("provider error {code}: {message}")]
pub struct ProviderRpcError {
    #[serde(default)]
    pub code: i64,
    #[serde(default)]
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<serde_json::Value>,
}

impl ProviderRpcError {
    pub fn new(code: i64, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            data: None,
        }
    }

    pub fn user_rejected() -> Self {
        Self::new(CODE_USER_REJECTED, "User rejected the request.")
    }

    pub fn is_user_rejection(&self) -> bool {
        self.code == CODE_USER_REJECTED
    }

    /// Short name of the standard EIP-1193 code, if it is one.
    pub fn kind(&self) -> Option<&'static str> {
        match self.code {
            CODE_USER_REJECTED => Some("user rejected request"),
            CODE_UNAUTHORIZED => Some("unauthorized"),
            CODE_UNSUPPORTED_METHOD => Some("unsupported method"),
            CODE_DISCONNECTED => Some("disconnected"),
            CODE_CHAIN_DISCONNECTED => Some("chain disconnected"),
            _ => None,
        }
    }
}

/// Errors returned by adapter operations.
#[derive(Debug, Error)]
pub enum AdapterError {
    #[error("no wallet provider detected")]
    ProviderAbsent,

    #[error("detected provider differs from the ambient provider (multiple wallets installed?)")]
    MultiProviderConflict,

    #[error("user rejected the request")]
    UserRejected,

    #[error("unexpected provider error: {0}")]
    UnknownProviderError(ProviderRpcError),

    #[error("no active account")]
    NoActiveAccount,

    #[error("a signature request is already waiting for the wallet")]
    SignaturePending,

    #[error("missing `{0}` query parameter")]
    MissingPayload(String),

    #[error("report to {path} failed: {reason}")]
    ReportDeliveryFailure { path: String, reason: String },

    #[error("invalid provider response: {0}")]
    InvalidResponse(String),

    #[error("http error: {0}")]
    HttpError(String),

    #[error("timed out waiting for {0}")]
    Timeout(&'static str),

    #[error("config error: {0}")]
    ConfigError(String),
}

impl From<ProviderRpcError> for AdapterError {
    fn from(err: ProviderRpcError) -> Self {
        if err.is_user_rejection() {
            AdapterError::UserRejected
        } else {
            AdapterError::UnknownProviderError(err)
        }
    }
}
