use serde_json::Value;

use crate::constants::METHOD_REQUEST_ACCOUNTS;
use crate::error::{AdapterError, ProviderRpcError};
use crate::provider::{Provider, RequestArguments};
use crate::report::{Outbox, Reporter};
use crate::session::{parse_accounts, AccountSession, Reconciliation};
use crate::surface::Surface;

/// The EIP-1102 permission request.
pub fn accounts_request() -> RequestArguments {
    RequestArguments::new(METHOD_REQUEST_ACCOUNTS)
}

/// Apply the provider's answer to [`accounts_request`].
///
/// A rejection comes back as [`AdapterError::UserRejected`] and leaves the
/// session untouched; any other provider error as
/// [`AdapterError::UnknownProviderError`].
pub fn accounts_granted<V: Surface, R: Reporter + 'static>(
    answer: Result<Value, ProviderRpcError>,
    session: &mut AccountSession,
    surface: &V,
    outbox: &mut Outbox<R>,
) -> Result<Reconciliation, AdapterError> {
    let accounts = parse_accounts(answer?)?;
    Ok(session.handle_accounts(accounts, surface, outbox))
}

/// Ask the user for account access and reconcile the answer.
pub async fn request_accounts<P: Provider, V: Surface, R: Reporter + 'static>(
    provider: &P,
    session: &mut AccountSession,
    surface: &V,
    outbox: &mut Outbox<R>,
) -> Result<Reconciliation, AdapterError> {
    let answer = provider.request(accounts_request()).await;
    accounts_granted(answer, session, surface, outbox)
}
