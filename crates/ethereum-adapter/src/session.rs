//! Connected-account tracking.
//!
//! Both account feeds (the startup `eth_accounts` query and `accountsChanged`)
//! go through [`AccountSession::reconcile`]. Reconciliation compares the new
//! active account with the current one before acting, so replaying or
//! interleaving the feeds is harmless.

use serde_json::Value;

use crate::constants::METHOD_ACCOUNTS;
use crate::error::AdapterError;
use crate::provider::{Provider, RequestArguments};
use crate::report::{EthAddress, Outbox, Report, Reporter};
use crate::surface::Surface;

/// What a reconciliation changed.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Reconciliation {
    /// The account list was empty.
    Disconnected,
    /// A new active account; it must be reported.
    Connected(String),
    /// Same active account as before.
    Unchanged,
}

#[derive(Debug, Default)]
pub struct AccountSession {
    current: Option<String>,
    /// Snapshot of the list seen by the most recent reconciliation.
    accounts: Vec<String>,
}

impl AccountSession {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pure state transition for a provider-reported account list.
    pub fn reconcile(&mut self, accounts: Vec<String>) -> Reconciliation {
        let outcome = match accounts.first() {
            None => {
                self.current = None;
                Reconciliation::Disconnected
            }
            Some(first) if self.current.as_deref() == Some(first.as_str()) => {
                Reconciliation::Unchanged
            }
            Some(first) => {
                self.current = Some(first.clone());
                Reconciliation::Connected(first.clone())
            }
        };
        self.accounts = accounts;
        outcome
    }

    /// Reconcile and apply the outcome to the page and the server.
    pub fn handle_accounts<V: Surface, R: Reporter + 'static>(
        &mut self,
        accounts: Vec<String>,
        surface: &V,
        outbox: &mut Outbox<R>,
    ) -> Reconciliation {
        let outcome = self.reconcile(accounts);
        match &outcome {
            Reconciliation::Disconnected => {
                tracing::info!("no connected account");
                surface.show_disconnected();
            }
            Reconciliation::Connected(account) => {
                tracing::info!(%account, "account connected");
                surface.show_connected(account);
                outbox.send(Report::Address(EthAddress::new(account.clone())));
            }
            Reconciliation::Unchanged => tracing::debug!("account list unchanged"),
        }
        outcome
    }

    /// Startup query for accounts the page is already authorized for.
    ///
    /// A failed request leaves the session untouched: "unknown" is not the
    /// same as an explicit empty list.
    pub async fn load<P: Provider, V: Surface, R: Reporter + 'static>(
        &mut self,
        provider: &P,
        surface: &V,
        outbox: &mut Outbox<R>,
    ) -> Result<Reconciliation, AdapterError> {
        let value = provider
            .request(RequestArguments::new(METHOD_ACCOUNTS))
            .await
            .map_err(AdapterError::from)?;
        let accounts = parse_accounts(value)?;
        Ok(self.handle_accounts(accounts, surface, outbox))
    }

    pub fn current_account(&self) -> Option<&str> {
        self.current.as_deref()
    }

    /// The account the sign flow uses: first entry of the snapshot.
    pub fn active_account(&self) -> Option<&str> {
        self.accounts.first().map(String::as_str)
    }

    pub fn accounts(&self) -> &[String] {
        &self.accounts
    }
}

pub(crate) fn parse_accounts(value: Value) -> Result<Vec<String>, AdapterError> {
    serde_json::from_value(value)
        .map_err(|e| AdapterError::InvalidResponse(format!("expected an account list: {e}")))
}
