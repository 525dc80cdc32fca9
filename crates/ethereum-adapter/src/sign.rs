//! Payload signing via `personal_sign`.
//!
//! The message handed to the provider is `0x` followed by the lowercase hex of
//! the payload's UTF-8 bytes. The server recomputes the same encoding when it
//! checks the signature, so it must not change.

use alloy::primitives::hex;
use serde_json::Value;

use crate::constants::METHOD_PERSONAL_SIGN;
use crate::error::{AdapterError, ProviderRpcError};
use crate::provider::{Provider, RequestArguments};
use crate::report::{EthAddress, Outbox, Report, Reporter, Signature};
use crate::session::AccountSession;
use crate::surface::Surface;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum DeploySignState {
    #[default]
    NotSigning,
    WaitingForSignature,
    Signed,
}

/// Read `param` from a query string (with or without the leading `?`).
/// An empty value counts as absent.
pub fn payload_from_query(query: &str, param: &str) -> Option<String> {
    url::form_urlencoded::parse(query.trim_start_matches('?').as_bytes())
        .find(|(key, _)| key == param)
        .map(|(_, value)| value.into_owned())
        .filter(|value| !value.is_empty())
}

/// `0x`-prefixed hex of the payload's UTF-8 bytes.
pub fn encode_message(payload: &str) -> String {
    hex::encode_prefixed(payload.as_bytes())
}

/// A `personal_sign` request the provider has not answered yet.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PendingSignature {
    account: String,
    message: String,
}

impl PendingSignature {
    pub fn account(&self) -> &str {
        &self.account
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn request(&self) -> RequestArguments {
        RequestArguments::with_params(
            METHOD_PERSONAL_SIGN,
            vec![
                Value::String(self.message.clone()),
                Value::String(self.account.clone()),
            ],
        )
    }
}

pub struct SignFlow {
    payload_param: String,
    state: DeploySignState,
}

impl SignFlow {
    pub fn new(payload_param: impl Into<String>) -> Self {
        Self {
            payload_param: payload_param.into(),
            state: DeploySignState::NotSigning,
        }
    }

    pub fn state(&self) -> DeploySignState {
        self.state
    }

    /// Check the preconditions and move to `WaitingForSignature`.
    ///
    /// The payload comes from `query`, the account is the session's active
    /// one. Only one request may be outstanding at a time.
    pub fn begin(
        &mut self,
        query: &str,
        session: &AccountSession,
    ) -> Result<PendingSignature, AdapterError> {
        if self.state == DeploySignState::WaitingForSignature {
            return Err(AdapterError::SignaturePending);
        }
        let payload = payload_from_query(query, &self.payload_param)
            .ok_or_else(|| AdapterError::MissingPayload(self.payload_param.clone()))?;
        let message = encode_message(&payload);
        let account = session
            .active_account()
            .ok_or(AdapterError::NoActiveAccount)?
            .to_string();

        tracing::info!(%account, bytes = payload.len(), "requesting signature");
        self.state = DeploySignState::WaitingForSignature;
        Ok(PendingSignature { account, message })
    }

    /// Apply the provider's answer to a request from [`SignFlow::begin`].
    ///
    /// On failure nothing is reported and the page does not change.
    pub fn complete<V: Surface, R: Reporter + 'static>(
        &mut self,
        pending: PendingSignature,
        answer: Result<Value, ProviderRpcError>,
        surface: &V,
        outbox: &mut Outbox<R>,
    ) -> Result<Signature, AdapterError> {
        let signature = match answer {
            Ok(Value::String(signature)) => signature,
            Ok(other) => {
                self.state = DeploySignState::NotSigning;
                return Err(AdapterError::InvalidResponse(format!(
                    "expected a signature string, got {other}"
                )));
            }
            Err(e) => {
                self.state = DeploySignState::NotSigning;
                return Err(e.into());
            }
        };

        let signed = Signature {
            by: EthAddress::new(pending.account),
            signature,
        };
        outbox.send(Report::Signature(signed.clone()));
        surface.show_signed();
        self.state = DeploySignState::Signed;
        Ok(signed)
    }

    /// [`SignFlow::begin`], the provider round trip, then
    /// [`SignFlow::complete`].
    pub async fn sign<P: Provider, V: Surface, R: Reporter + 'static>(
        &mut self,
        query: &str,
        provider: &P,
        session: &AccountSession,
        surface: &V,
        outbox: &mut Outbox<R>,
    ) -> Result<Signature, AdapterError> {
        let pending = self.begin(query, session)?;
        let answer = provider.request(pending.request()).await;
        self.complete(pending, answer, surface, outbox)
    }
}
