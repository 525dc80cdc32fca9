//! Native side of the browser flow.
//!
//! A CLI cannot talk to a browser wallet directly. It asks the user to open
//! the adapter server's login or sign page, then polls the server until the
//! page has reported an address or a signature.

use std::time::Duration;

use serde::de::DeserializeOwned;
use tokio::time::Instant;

use crate::constants::{ADDRESS_PATH, LOGIN_PATH, PAYLOAD_PARAM, SIGNATURE_PATH, SIGN_PATH};
use crate::error::AdapterError;
use crate::report::{EthAddress, Signature};
use crate::sign::DeploySignState;

/// How long and how often to poll the server.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PollOptions {
    pub interval: Duration,
    pub timeout: Duration,
}

impl Default for PollOptions {
    fn default() -> Self {
        Self {
            interval: Duration::from_secs(1),
            timeout: Duration::from_secs(300),
        }
    }
}

pub struct AdapterClient {
    http: reqwest::Client,
    base_url: String,
    sign_state: DeploySignState,
}

impl AdapterClient {
    pub fn new(base_url: &str) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            sign_state: DeploySignState::NotSigning,
        }
    }

    /// Page the user opens to connect a wallet.
    pub fn login_url(&self) -> String {
        format!("{}{}", self.base_url, LOGIN_PATH)
    }

    /// Page the user opens to sign `payload`. Newlines and other reserved
    /// characters are percent-encoded.
    pub fn sign_url(&self, payload: &str) -> String {
        format!(
            "{}{}?{}={}",
            self.base_url,
            SIGN_PATH,
            PAYLOAD_PARAM,
            urlencoding::encode(payload)
        )
    }

    pub fn sign_state(&self) -> DeploySignState {
        self.sign_state
    }

    /// Last address the page reported, if any.
    pub async fn address(&self) -> Result<Option<EthAddress>, AdapterError> {
        self.get_json(ADDRESS_PATH).await
    }

    /// Last signature the page reported, if any.
    pub async fn signature(&self) -> Result<Option<Signature>, AdapterError> {
        self.get_json(SIGNATURE_PATH).await
    }

    pub async fn reset_address(&self) -> Result<(), AdapterError> {
        self.delete(ADDRESS_PATH).await
    }

    pub async fn reset_signature(&self) -> Result<(), AdapterError> {
        self.delete(SIGNATURE_PATH).await
    }

    /// Clear any stale address and return the login URL.
    pub async fn login(&self) -> Result<String, AdapterError> {
        self.reset_address().await?;
        let url = self.login_url();
        tracing::info!(%url, "login at");
        Ok(url)
    }

    /// Clear any stale signature and return the sign URL for `payload`.
    pub async fn request_signature(&mut self, payload: &str) -> Result<String, AdapterError> {
        self.reset_signature().await?;
        self.sign_state = DeploySignState::WaitingForSignature;
        let url = self.sign_url(payload);
        tracing::info!(%url, "sign at");
        Ok(url)
    }

    pub async fn wait_for_address(&self, poll: PollOptions) -> Result<EthAddress, AdapterError> {
        self.wait_for(ADDRESS_PATH, "address", poll).await
    }

    /// Leaves `sign_state` at `Signed` on success and `NotSigning` on any
    /// error.
    pub async fn wait_for_signature(
        &mut self,
        poll: PollOptions,
    ) -> Result<Signature, AdapterError> {
        let result = self.wait_for(SIGNATURE_PATH, "signature", poll).await;
        self.sign_state = match result {
            Ok(_) => DeploySignState::Signed,
            Err(_) => DeploySignState::NotSigning,
        };
        result
    }

    /// Poll `path` until it holds a value. The timeout is wall-clock time,
    /// request time included.
    async fn wait_for<T: DeserializeOwned>(
        &self,
        path: &str,
        what: &'static str,
        poll: PollOptions,
    ) -> Result<T, AdapterError> {
        let deadline = Instant::now().checked_add(poll.timeout);
        loop {
            if let Some(value) = self.get_json(path).await? {
                return Ok(value);
            }
            let now = Instant::now();
            let pause = match deadline {
                Some(deadline) if now >= deadline => return Err(AdapterError::Timeout(what)),
                Some(deadline) => poll.interval.min(deadline - now),
                None => poll.interval,
            };
            tracing::debug!(what, "waiting for the page");
            tokio::time::sleep(pause).await;
        }
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<Option<T>, AdapterError> {
        let resp = self
            .http
            .get(format!("{}{}", self.base_url, path))
            .header("Accept", "application/json")
            .send()
            .await
            .map_err(|e| AdapterError::HttpError(format!("GET {path} failed: {e}")))?;
        if !resp.status().is_success() {
            return Err(AdapterError::HttpError(format!(
                "GET {path} returned {}",
                resp.status()
            )));
        }
        resp.json::<Option<T>>()
            .await
            .map_err(|e| AdapterError::HttpError(format!("GET {path} parse failed: {e}")))
    }

    async fn delete(&self, path: &str) -> Result<(), AdapterError> {
        let resp = self
            .http
            .delete(format!("{}{}", self.base_url, path))
            .send()
            .await
            .map_err(|e| AdapterError::HttpError(format!("DELETE {path} failed: {e}")))?;
        if !resp.status().is_success() {
            return Err(AdapterError::HttpError(format!(
                "DELETE {path} returned {}",
                resp.status()
            )));
        }
        Ok(())
    }
}
